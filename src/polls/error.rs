//! Poll Errors
//!
//! Error taxonomy for poll creation, ballot validation, and store access.

use serde::{Deserialize, Serialize};

/// Poll-creation shape violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("At least {min} choices are required (got {count})")]
    TooFewChoices { count: usize, min: usize },

    #[error("Too many choices: {count} (max {max})")]
    TooManyChoices { count: usize, max: usize },

    #[error("Max votes per user must be at least 1")]
    InvalidMaxVotes,

    #[error("Identifier must not be empty: {0}")]
    EmptyIdentifier(&'static str),

    #[error("Poll '{0}' already exists")]
    PollExists(String),
}

/// Why the ballot validator refused a cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    #[error("This poll is closed")]
    PollClosed,

    #[error("Invalid choice")]
    InvalidChoiceIndex,

    #[error("Vote limit reached")]
    MaxVotesReached,

    /// Reserved: a repeat cast on the same choice is always a retract, so the
    /// validator never reports this today.
    #[error("You have already voted for this choice")]
    DuplicateChoiceNotAllowed,

    #[error("You have already voted")]
    AlreadyVotedElsewhere,
}

/// Operational failures surfaced by the engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Poll '{0}' not found")]
    PollNotFound(String),

    #[error("Only the poll creator can close or reopen it")]
    NotCreator,

    #[error("Identifier must not be empty: {0}")]
    EmptyIdentifier(&'static str),

    #[error(transparent)]
    Rejected(#[from] RejectReason),
}

/// The store already holds a poll under this id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Poll '{0}' already exists")]
pub struct AlreadyExists(pub String);

/// The store holds no poll under this id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Poll '{0}' not found")]
pub struct NotFound(pub String);

impl From<NotFound> for EngineError {
    fn from(err: NotFound) -> Self {
        EngineError::PollNotFound(err.0)
    }
}

impl From<AlreadyExists> for ValidationError {
    fn from(err: AlreadyExists) -> Self {
        ValidationError::PollExists(err.0)
    }
}
