//! Vote Command Parsing
//!
//! Turns `/vote` slash-command options into a [`PollRequest`].

use super::event::{CommandOption, OptionValue};
use super::GatewayError;
use crate::config::PollDefaults;
use crate::polls::{PollPolicy, PollRequest};
use chrono::{DateTime, Duration, Utc};

/// Parsed `/vote` command
#[derive(Debug, Clone, PartialEq)]
pub struct VoteCommand {
    pub title: String,
    pub description: String,
    pub choices: Vec<String>,
    pub due_at: DateTime<Utc>,
    pub policy: PollPolicy,
}

impl VoteCommand {
    /// Parse command options. Unknown option names are ignored.
    ///
    /// `choices` is a comma-separated list; `due` is RFC 3339. Missing values
    /// fall back to `defaults`, and `duplicate` turns `editable` off.
    pub fn parse(
        options: &[CommandOption],
        defaults: &PollDefaults,
        now: DateTime<Utc>,
    ) -> Result<Self, GatewayError> {
        let mut title = None;
        let mut description = String::new();
        let mut choices = None;
        let mut due_at = None;
        let mut max_votes = defaults.default_max_votes;
        let mut anonymous = false;
        let mut mask = false;
        let mut editable = defaults.default_editable;
        let mut duplicate = false;

        for option in options {
            match option.name.as_str() {
                "title" => title = Some(string_value(option)?),
                "description" => description = string_value(option)?,
                "choices" => choices = Some(split_choices(&string_value(option)?)?),
                "due" => {
                    let raw = string_value(option)?;
                    let due = DateTime::parse_from_rfc3339(raw.trim())
                        .map_err(|e| GatewayError::InvalidDue(e.to_string()))?;
                    due_at = Some(due.with_timezone(&Utc));
                }
                "anonymous" => anonymous = bool_value(option)?,
                "mask" => mask = bool_value(option)?,
                "editable" => editable = bool_value(option)?,
                "duplicate" => duplicate = bool_value(option)?,
                "max" => {
                    let raw = int_value(option)?;
                    max_votes = u32::try_from(raw).map_err(|_| GatewayError::InvalidOption {
                        name: "max".to_string(),
                        reason: format!("{raw} is out of range"),
                    })?;
                }
                _ => {}
            }
        }

        let title = title.ok_or(GatewayError::MissingOption("title"))?;
        let choices = choices.ok_or(GatewayError::MissingOption("choices"))?;
        let due_at = match due_at {
            Some(due) => due,
            None => Duration::try_days(defaults.default_due_days)
                .and_then(|days| now.checked_add_signed(days))
                .ok_or_else(|| GatewayError::InvalidOption {
                    name: "due".to_string(),
                    reason: format!("{} days from now is out of range", defaults.default_due_days),
                })?,
        };

        let policy = PollPolicy::default()
            .with_max_votes(max_votes)
            .anonymous(anonymous)
            .mask_results(mask)
            .editable(editable)
            .allow_duplicate(duplicate);

        Ok(Self {
            title,
            description,
            choices,
            due_at,
            policy,
        })
    }

    /// Build the engine request for the message `message_id` created by `creator_id`
    pub fn into_request(self, message_id: &str, creator_id: &str) -> PollRequest {
        PollRequest::new(message_id, self.title, self.choices, creator_id, self.due_at)
            .with_description(self.description)
            .with_policy(self.policy)
    }
}

fn split_choices(raw: &str) -> Result<Vec<String>, GatewayError> {
    raw.split(',')
        .map(|c| match c.trim() {
            "" => Err(GatewayError::InvalidOption {
                name: "choices".to_string(),
                reason: "empty choice label".to_string(),
            }),
            label => Ok(label.to_string()),
        })
        .collect()
}

fn string_value(option: &CommandOption) -> Result<String, GatewayError> {
    match &option.value {
        OptionValue::String(s) => Ok(s.clone()),
        _ => Err(type_error(option, "string")),
    }
}

fn bool_value(option: &CommandOption) -> Result<bool, GatewayError> {
    match option.value {
        OptionValue::Bool(b) => Ok(b),
        _ => Err(type_error(option, "boolean")),
    }
}

fn int_value(option: &CommandOption) -> Result<i64, GatewayError> {
    match option.value {
        OptionValue::Integer(i) => Ok(i),
        _ => Err(type_error(option, "integer")),
    }
}

fn type_error(option: &CommandOption, expected: &str) -> GatewayError {
    GatewayError::InvalidOption {
        name: option.name.clone(),
        reason: format!("expected {expected}"),
    }
}
