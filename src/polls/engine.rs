//! Poll Engine
//!
//! Handles poll creation, casting and retracting ballots, and open/close
//! toggles. Every change goes through [`PollStore::mutate_exclusive`], with the
//! [`validator`](super::validator) deciding what a cast means.

use super::error::{EngineError, ValidationError};
use super::model::{Ballot, Poll, PollPolicy, MAX_CHOICES, MIN_CHOICES};
use super::snapshot::PollSnapshot;
use super::store::PollStore;
use super::validator::{decide, Outcome};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything needed to create a poll
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub choices: Vec<String>,
    pub policy: PollPolicy,
    pub creator_id: String,
    pub due_at: DateTime<Utc>,
}

impl PollRequest {
    /// Create a request with default policy and no description
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        choices: Vec<String>,
        creator_id: impl Into<String>,
        due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            choices,
            policy: PollPolicy::default(),
            creator_id: creator_id.into(),
            due_at,
        }
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set policy
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Check the request's shape. Choice count is checked first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let count = self.choices.len();
        if count < MIN_CHOICES {
            return Err(ValidationError::TooFewChoices {
                count,
                min: MIN_CHOICES,
            });
        }
        if count > MAX_CHOICES {
            return Err(ValidationError::TooManyChoices {
                count,
                max: MAX_CHOICES,
            });
        }
        if self.policy.max_votes_per_user == 0 {
            return Err(ValidationError::InvalidMaxVotes);
        }
        if self.id.is_empty() {
            return Err(ValidationError::EmptyIdentifier("poll id"));
        }
        if self.creator_id.is_empty() {
            return Err(ValidationError::EmptyIdentifier("creator id"));
        }
        Ok(())
    }
}

/// Poll engine: the operations a gateway calls
#[derive(Debug, Default)]
pub struct PollEngine {
    store: PollStore,
}

impl PollEngine {
    /// Create a new poll engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a poll with empty ballots and return its snapshot
    pub fn create_poll(&self, request: PollRequest) -> Result<PollSnapshot, ValidationError> {
        request.validate()?;

        let PollRequest {
            id,
            title,
            description,
            choices,
            policy,
            creator_id,
            due_at,
        } = request;

        let poll = Poll::new(
            id.clone(),
            title,
            description,
            choices,
            creator_id,
            due_at,
            policy,
            Utc::now(),
        );
        let snapshot = PollSnapshot::of(&poll);
        self.store.create(&id, poll)?;

        info!(
            poll_id = %id,
            creator_id = %snapshot.creator_id,
            choices = snapshot.choices.len(),
            "Poll created"
        );
        Ok(snapshot)
    }

    /// Cast a ballot for `choice`, or retract it if the voter already holds one there
    pub fn cast_or_retract(
        &self,
        poll_id: &str,
        choice: usize,
        voter_id: &str,
    ) -> Result<PollSnapshot, EngineError> {
        if voter_id.is_empty() {
            return Err(EngineError::EmptyIdentifier("voter id"));
        }

        let (outcome, snapshot) = self.store.mutate_exclusive(poll_id, |poll| {
            let outcome = decide(poll, choice, voter_id);
            let next = apply(poll, outcome, choice, voter_id, Utc::now());
            let snapshot = PollSnapshot::of(&next);
            (next, (outcome, snapshot))
        })?;

        match outcome {
            Outcome::Cast => {
                debug!(poll_id, voter_id, choice, "Ballot cast");
                Ok(snapshot)
            }
            Outcome::Retract => {
                debug!(poll_id, voter_id, choice, "Ballot retracted");
                Ok(snapshot)
            }
            Outcome::Rejected(reason) => {
                debug!(poll_id, voter_id, choice, ?reason, "Ballot rejected");
                Err(reason.into())
            }
        }
    }

    /// Flip a poll between open and closed. Only the creator may do this.
    pub fn toggle_poll(
        &self,
        poll_id: &str,
        requester_id: &str,
    ) -> Result<PollSnapshot, EngineError> {
        if requester_id.is_empty() {
            return Err(EngineError::EmptyIdentifier("requester id"));
        }

        let result = self.store.mutate_exclusive(poll_id, |poll| {
            if poll.creator_id != requester_id {
                return (poll.clone(), Err(EngineError::NotCreator));
            }
            let mut next = poll.clone();
            next.is_closed = !next.is_closed;
            next.last_update = Utc::now();
            let snapshot = PollSnapshot::of(&next);
            (next, Ok(snapshot))
        })?;

        match &result {
            Ok(snapshot) => info!(poll_id, closed = snapshot.is_closed, "Poll toggled"),
            Err(_) => debug!(poll_id, requester_id, "Toggle refused for non-creator"),
        }
        result
    }

    /// Current snapshot of a poll
    pub fn snapshot(&self, poll_id: &str) -> Result<PollSnapshot, EngineError> {
        let poll = self.store.read(poll_id)?;
        Ok(PollSnapshot::of(&poll))
    }

    /// Get poll statistics
    pub fn stats(&self) -> PollEngineStats {
        let mut stats = PollEngineStats::default();
        self.store.for_each(|poll| {
            stats.total_polls += 1;
            if poll.is_closed {
                stats.closed_polls += 1;
            } else {
                stats.open_polls += 1;
            }
            stats.total_ballots += poll.total_ballots();
        });
        stats
    }
}

/// Produce the poll that results from `outcome`. Rejections return an exact copy.
fn apply(poll: &Poll, outcome: Outcome, choice: usize, voter_id: &str, now: DateTime<Utc>) -> Poll {
    let mut next = poll.clone();
    match outcome {
        Outcome::Cast => {
            next.ballots_by_choice[choice].push(Ballot::new(voter_id, now));
            next.last_update = now;
        }
        Outcome::Retract => {
            next.ballots_by_choice[choice].retain(|b| b.voter_id != voter_id);
            next.last_update = now;
        }
        Outcome::Rejected(_) => {}
    }
    next
}

/// Statistics for the poll engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollEngineStats {
    /// Total number of polls
    pub total_polls: usize,
    /// Number of open polls
    pub open_polls: usize,
    /// Number of closed polls
    pub closed_polls: usize,
    /// Total ballots across all polls
    pub total_ballots: usize,
}

/// Create a shared poll engine
pub fn create_engine() -> Arc<PollEngine> {
    Arc::new(PollEngine::new())
}
