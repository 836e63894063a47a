//! Polling Module
//!
//! In-memory poll engine for chat-bot vote commands. Polls are created from a
//! command, then mutated by button presses that may arrive concurrently and in
//! any order.

pub mod engine;
pub mod error;
pub mod model;
pub mod snapshot;
pub mod store;
pub mod validator;

pub use engine::{create_engine, PollEngine, PollEngineStats, PollRequest};
pub use error::{AlreadyExists, EngineError, NotFound, RejectReason, ValidationError};
pub use model::{Ballot, Poll, PollPolicy, MAX_CHOICES, MIN_CHOICES};
pub use snapshot::{ChoiceTally, PollSnapshot};
pub use store::PollStore;
pub use validator::{decide, Outcome};
