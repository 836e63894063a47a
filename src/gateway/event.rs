//! Gateway Events
//!
//! The inbound interaction taxonomy a chat platform delivers, reduced to the
//! two shapes the poll engine cares about.

use super::GatewayError;
use serde::{Deserialize, Serialize};

/// Custom id of the close/reopen button
pub const TOGGLE_CUSTOM_ID: &str = "toggle";

/// Prefix of choice button custom ids (`choice_0`, `choice_1`, ...)
pub const CHOICE_CUSTOM_ID_PREFIX: &str = "choice_";

/// Inbound event from the chat platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A `/vote` slash command whose response message is `message_id`
    Command {
        message_id: String,
        user_id: String,
        #[serde(default)]
        options: Vec<CommandOption>,
    },
    /// A button press on a rendered poll message
    Component {
        message_id: String,
        user_id: String,
        custom_id: String,
    },
}

impl GatewayEvent {
    /// Message id the event targets
    pub fn message_id(&self) -> &str {
        match self {
            GatewayEvent::Command { message_id, .. } | GatewayEvent::Component { message_id, .. } => {
                message_id
            }
        }
    }
}

/// One named slash-command option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Slash-command option value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    String(String),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Integer(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::String(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::String(v)
    }
}

/// What a button press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentAction {
    /// Cast or retract on the given choice index
    Choice(usize),
    /// Close or reopen the poll
    Toggle,
}

impl ComponentAction {
    /// Parse a button custom id
    pub fn parse(custom_id: &str) -> Result<Self, GatewayError> {
        if custom_id == TOGGLE_CUSTOM_ID {
            return Ok(ComponentAction::Toggle);
        }
        custom_id
            .strip_prefix(CHOICE_CUSTOM_ID_PREFIX)
            .filter(|index| index.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|index| index.parse::<usize>().ok())
            .map(ComponentAction::Choice)
            .ok_or_else(|| GatewayError::UnknownComponent(custom_id.to_string()))
    }

    /// Custom id for the button of choice `index`
    pub fn choice_custom_id(index: usize) -> String {
        format!("{CHOICE_CUSTOM_ID_PREFIX}{index}")
    }
}
