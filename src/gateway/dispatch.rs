//! Event Dispatch
//!
//! Routes gateway events onto poll engine operations and turns the result
//! into a reply for the platform to send.

use super::command::VoteCommand;
use super::event::{ComponentAction, GatewayEvent};
use super::render::{render_poll, RenderedPoll};
use super::GatewayResult;
use crate::config::PollDefaults;
use crate::polls::{PollEngine, PollSnapshot};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// What the platform should do in response to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum GatewayReply {
    /// Create or update the poll message
    Render(RenderedPoll),
    /// Show an error only to the user who triggered the event
    Ephemeral { message_id: String, content: String },
}

/// Maps gateway events onto a shared [`PollEngine`]
#[derive(Debug, Clone)]
pub struct Dispatcher {
    engine: Arc<PollEngine>,
    defaults: PollDefaults,
}

impl Dispatcher {
    pub fn new(engine: Arc<PollEngine>, defaults: PollDefaults) -> Self {
        Self { engine, defaults }
    }

    /// Engine this dispatcher drives
    pub fn engine(&self) -> &Arc<PollEngine> {
        &self.engine
    }

    /// Handle one event. Failures become an ephemeral error reply.
    pub fn handle(&self, event: GatewayEvent) -> GatewayReply {
        let message_id = event.message_id().to_string();
        match self.try_handle(event) {
            Ok(snapshot) => GatewayReply::Render(render_poll(&snapshot)),
            Err(err) => {
                debug!(message_id = %message_id, error = %err, "Interaction refused");
                GatewayReply::Ephemeral {
                    message_id,
                    content: format!("Error: {err}"),
                }
            }
        }
    }

    /// Handle one event, returning the resulting snapshot
    pub fn try_handle(&self, event: GatewayEvent) -> GatewayResult<PollSnapshot> {
        match event {
            GatewayEvent::Command {
                message_id,
                user_id,
                options,
            } => {
                let command = VoteCommand::parse(&options, &self.defaults, Utc::now())?;
                let request = command.into_request(&message_id, &user_id);
                Ok(self.engine.create_poll(request)?)
            }
            GatewayEvent::Component {
                message_id,
                user_id,
                custom_id,
            } => match ComponentAction::parse(&custom_id) {
                Ok(ComponentAction::Choice(index)) => {
                    Ok(self.engine.cast_or_retract(&message_id, index, &user_id)?)
                }
                Ok(ComponentAction::Toggle) => Ok(self.engine.toggle_poll(&message_id, &user_id)?),
                Err(err) => {
                    warn!(message_id = %message_id, custom_id = %custom_id, "Unknown component");
                    Err(err)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::event::CommandOption;
    use crate::gateway::GatewayError;
    use crate::polls::{EngineError, RejectReason, ValidationError};

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(PollEngine::new()), PollDefaults::default())
    }

    fn create(d: &Dispatcher, choices: &str) -> GatewayReply {
        d.handle(GatewayEvent::Command {
            message_id: "m1".into(),
            user_id: "owner".into(),
            options: vec![
                CommandOption::new("title", "Lunch"),
                CommandOption::new("choices", choices),
            ],
        })
    }

    fn press(d: &Dispatcher, user: &str, custom_id: &str) -> Result<PollSnapshot, GatewayError> {
        d.try_handle(GatewayEvent::Component {
            message_id: "m1".into(),
            user_id: user.into(),
            custom_id: custom_id.into(),
        })
    }

    #[test]
    fn test_command_renders_poll() {
        let d = dispatcher();
        match create(&d, "A,B,C") {
            GatewayReply::Render(rendered) => {
                assert_eq!(rendered.message_id, "m1");
                assert_eq!(rendered.embed.fields.len(), 3);
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_command_with_one_choice_is_ephemeral_error() {
        let d = dispatcher();
        match create(&d, "only") {
            GatewayReply::Ephemeral { content, .. } => assert!(content.starts_with("Error: ")),
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!(
            press(&d, "u1", "choice_0").unwrap_err(),
            GatewayError::Engine(EngineError::PollNotFound("m1".into()))
        );
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let d = dispatcher();
        create(&d, "A,B");
        let err = d
            .try_handle(GatewayEvent::Command {
                message_id: "m1".into(),
                user_id: "owner".into(),
                options: vec![
                    CommandOption::new("title", "Again"),
                    CommandOption::new("choices", "X,Y"),
                ],
            })
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Validation(ValidationError::PollExists("m1".into()))
        );
    }

    #[test]
    fn test_buttons_route_to_engine() {
        let d = dispatcher();
        create(&d, "A,B");

        let snap = press(&d, "u1", "choice_1").unwrap();
        assert_eq!(snap.choices[1].count, 1);

        assert_eq!(
            press(&d, "u1", "choice_0").unwrap_err(),
            GatewayError::Engine(EngineError::Rejected(RejectReason::MaxVotesReached))
        );
        assert_eq!(
            press(&d, "u1", "toggle").unwrap_err(),
            GatewayError::Engine(EngineError::NotCreator)
        );
        assert!(press(&d, "owner", "toggle").unwrap().is_closed);
        assert_eq!(
            press(&d, "u2", "choice_0").unwrap_err(),
            GatewayError::Engine(EngineError::Rejected(RejectReason::PollClosed))
        );
    }

    #[test]
    fn test_unknown_component() {
        let d = dispatcher();
        create(&d, "A,B");
        assert_eq!(
            press(&d, "u1", "bogus").unwrap_err(),
            GatewayError::UnknownComponent("bogus".into())
        );
        match d.handle(GatewayEvent::Component {
            message_id: "m1".into(),
            user_id: "u1".into(),
            custom_id: "choice_7".into(),
        }) {
            GatewayReply::Ephemeral { message_id, content } => {
                assert_eq!(message_id, "m1");
                assert_eq!(content, "Error: Invalid choice");
            }
            other => panic!("unexpected reply: {other:?}"),
        }
    }

    #[test]
    fn test_far_default_due_is_an_error_reply() {
        let defaults = PollDefaults {
            default_due_days: 1_000_000_000,
            ..Default::default()
        };
        let d = Dispatcher::new(Arc::new(PollEngine::new()), defaults);
        match create(&d, "A,B") {
            GatewayReply::Ephemeral { content, .. } => assert!(content.starts_with("Error: ")),
            other => panic!("unexpected reply: {other:?}"),
        }
        assert_eq!(d.engine().stats().total_polls, 0);
    }
}
