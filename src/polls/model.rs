//! Poll Data Model
//!
//! Plain state for polls and ballots. Behavior lives in the validator and engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fewest choices a poll may carry
pub const MIN_CHOICES: usize = 2;

/// Most choices a poll may carry
pub const MAX_CHOICES: usize = 20;

/// Voting rules fixed at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Maximum ballots a single voter may hold across all choices
    #[serde(default = "default_max_votes")]
    pub max_votes_per_user: u32,
    /// Allow a voter to hold ballots on several different choices
    #[serde(default)]
    pub allow_duplicate_per_choice: bool,
    /// Hide voter identities from the rendered results
    #[serde(default)]
    pub anonymous: bool,
    /// Hide results until the poll is closed
    #[serde(default)]
    pub mask_results: bool,
    /// Informational: whether voters may change their selection
    #[serde(default = "default_true")]
    pub editable: bool,
}

fn default_max_votes() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_votes_per_user: 1,
            allow_duplicate_per_choice: false,
            anonymous: false,
            mask_results: false,
            editable: true,
        }
    }
}

impl PollPolicy {
    /// Set the per-voter ballot limit
    pub fn with_max_votes(mut self, max: u32) -> Self {
        self.max_votes_per_user = max;
        self
    }

    /// Allow ballots on several choices. Multi-choice polls are never editable.
    pub fn allow_duplicate(mut self, allow: bool) -> Self {
        self.allow_duplicate_per_choice = allow;
        if allow {
            self.editable = false;
        }
        self
    }

    /// Hide voter identities
    pub fn anonymous(mut self, anonymous: bool) -> Self {
        self.anonymous = anonymous;
        self
    }

    /// Hide results while the poll is open
    pub fn mask_results(mut self, mask: bool) -> Self {
        self.mask_results = mask;
        self
    }

    /// Set the editable flag
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable && !self.allow_duplicate_per_choice;
        self
    }
}

/// One voter's recorded selection for one choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter_id: String,
    pub cast_at: DateTime<Utc>,
}

impl Ballot {
    pub fn new(voter_id: impl Into<String>, cast_at: DateTime<Utc>) -> Self {
        Self {
            voter_id: voter_id.into(),
            cast_at,
        }
    }
}

/// A single vote-collection unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    /// Identifier assigned by the gateway (usually the rendered message id)
    pub id: String,
    pub title: String,
    pub description: String,
    /// Choice labels; indices are the canonical choice reference
    pub choices: Vec<String>,
    pub creator_id: String,
    /// Advisory only, never enforced
    pub due_at: DateTime<Utc>,
    pub policy: PollPolicy,
    /// One ballot list per choice, in cast order
    pub ballots_by_choice: Vec<Vec<Ballot>>,
    pub is_closed: bool,
    pub last_update: DateTime<Utc>,
}

impl Poll {
    /// Build an open poll with empty ballot lists. Shape checks happen in the engine.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        choices: Vec<String>,
        creator_id: impl Into<String>,
        due_at: DateTime<Utc>,
        policy: PollPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let ballots_by_choice = vec![Vec::new(); choices.len()];
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            choices,
            creator_id: creator_id.into(),
            due_at,
            policy,
            ballots_by_choice,
            is_closed: false,
            last_update: now,
        }
    }

    /// Total ballots across all choices
    pub fn total_ballots(&self) -> usize {
        self.ballots_by_choice.iter().map(Vec::len).sum()
    }

    /// Number of ballots held by `voter_id` across all choices
    pub fn ballots_by(&self, voter_id: &str) -> usize {
        self.ballots_by_choice
            .iter()
            .flatten()
            .filter(|b| b.voter_id == voter_id)
            .count()
    }

    /// Whether `voter_id` holds a ballot on `choice`
    pub fn has_ballot(&self, choice: usize, voter_id: &str) -> bool {
        self.ballots_by_choice
            .get(choice)
            .map(|ballots| ballots.iter().any(|b| b.voter_id == voter_id))
            .unwrap_or(false)
    }

    /// Whether the due timestamp has passed. Display only.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }
}
