//! Gateway Adapter
//!
//! Bridges a chat platform's interaction events to the poll engine: slash
//! commands create polls, button presses cast ballots or toggle the poll, and
//! every successful operation yields a message layout to render.

pub mod command;
pub mod dispatch;
pub mod event;
pub mod render;

pub use command::VoteCommand;
pub use dispatch::{Dispatcher, GatewayReply};
pub use event::{CommandOption, ComponentAction, GatewayEvent, OptionValue};
pub use render::{render_poll, RenderedPoll};

use crate::polls::{EngineError, ValidationError};

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors raised while turning an event into an engine call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Missing required option: {0}")]
    MissingOption(&'static str),

    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Invalid due date (expected RFC 3339): {0}")]
    InvalidDue(String),

    #[error("Invalid choice")]
    UnknownComponent(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
