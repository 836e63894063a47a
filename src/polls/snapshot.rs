//! Poll Snapshot
//!
//! Render-ready projection of a poll. Counts are always computed; the masked
//! flag tells the renderer what to hide.

use super::model::{Poll, PollPolicy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tally for one choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub label: String,
    pub count: u32,
    /// `floor(count * 100 / total)`, 0 when nobody has voted
    pub percentage: u32,
    /// Voters in cast order; `None` for anonymous polls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voters: Option<Vec<String>>,
}

/// Read-only view of a poll for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSnapshot {
    pub id: String,
    pub title: String,
    pub description: String,
    pub creator_id: String,
    pub due_at: DateTime<Utc>,
    pub policy: PollPolicy,
    pub choices: Vec<ChoiceTally>,
    pub total_votes: u32,
    pub is_closed: bool,
    /// Counts and voter lists should be hidden (mask policy on an open poll)
    pub masked: bool,
    pub last_update: DateTime<Utc>,
}

impl PollSnapshot {
    /// Project `poll` into a snapshot
    pub fn of(poll: &Poll) -> Self {
        let total_votes = poll.total_ballots() as u32;
        let choices = poll
            .choices
            .iter()
            .zip(&poll.ballots_by_choice)
            .map(|(label, ballots)| {
                let count = ballots.len() as u32;
                let voters = (!poll.policy.anonymous)
                    .then(|| ballots.iter().map(|b| b.voter_id.clone()).collect());
                ChoiceTally {
                    label: label.clone(),
                    count,
                    percentage: percentage(count, total_votes),
                    voters,
                }
            })
            .collect();

        Self {
            id: poll.id.clone(),
            title: poll.title.clone(),
            description: poll.description.clone(),
            creator_id: poll.creator_id.clone(),
            due_at: poll.due_at,
            policy: poll.policy.clone(),
            choices,
            total_votes,
            is_closed: poll.is_closed,
            masked: poll.policy.mask_results && !poll.is_closed,
            last_update: poll.last_update,
        }
    }

    /// Whether the advisory due time has passed
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.due_at
    }
}

fn percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as u64 * 100) / total as u64) as u32
}
