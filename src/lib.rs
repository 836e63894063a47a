//! tally poll engine library
//!
//! An in-memory poll engine for chat-bot vote commands: polls are created
//! from a slash command, ballots arrive as concurrent button presses, and
//! every operation returns a render-ready snapshot.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod polls;
