//! Normalizes raw gateway payloads into typed interaction events.
//!
//! Decoding never looks at poll state; a component id that parses is not
//! guaranteed to refer to a live poll.

use serde_json::Value;
use std::collections::HashMap;

use crate::error::BotError;
use crate::models::PollId;

pub const POLL_ACTION_PREFIX: &str = "poll";

/// A platform event with the platform types already stripped away.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    SlashCommand {
        name: String,
        options: Vec<RawOption>,
    },
    Component {
        custom_id: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawOption {
    pub name: String,
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args(HashMap<String, ArgValue>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Result<Option<&str>, BotError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(ArgValue::Text(text)) => Ok(Some(text.as_str())),
            Some(_) => Err(invalid(name, "expected text")),
        }
    }

    pub fn required_text(&self, name: &str) -> Result<&str, BotError> {
        self.text(name)?
            .ok_or_else(|| BotError::MissingArgument(name.to_string()))
    }

    pub fn integer(&self, name: &str) -> Result<Option<i64>, BotError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(ArgValue::Integer(value)) => Ok(Some(*value)),
            Some(_) => Err(invalid(name, "expected a whole number")),
        }
    }

    /// User options arrive as snowflake strings.
    pub fn user(&self, name: &str) -> Result<Option<u64>, BotError> {
        match self.text(name)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<u64>()
                .map(Some)
                .map_err(|_| invalid(name, "expected a user")),
        }
    }
}

fn invalid(name: &str, reason: &str) -> BotError {
    BotError::InvalidArgument {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    PollVote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    Command {
        name: String,
        args: Args,
    },
    ComponentAction {
        kind: ActionKind,
        correlation_id: PollId,
        payload: String,
    },
}

/// Who triggered an event, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: u64,
    pub name: String,
    pub avatar_url: Option<String>,
    pub guild_id: Option<u64>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub caller: Caller,
    pub event: InteractionEvent,
}

pub fn decode(raw: RawEvent) -> Result<InteractionEvent, BotError> {
    match raw {
        RawEvent::SlashCommand { name, options } => decode_command(name, options),
        RawEvent::Component { custom_id } => decode_component(&custom_id),
    }
}

fn decode_command(name: String, options: Vec<RawOption>) -> Result<InteractionEvent, BotError> {
    if name.trim().is_empty() {
        return Err(BotError::MalformedEvent("command without a name".to_string()));
    }

    let mut args = Args::new();
    for option in options {
        let value = match option.value {
            Some(Value::String(text)) => ArgValue::Text(text),
            Some(Value::Bool(flag)) => ArgValue::Bool(flag),
            Some(Value::Number(number)) => match number.as_i64() {
                Some(value) => ArgValue::Integer(value),
                None => {
                    return Err(BotError::MalformedEvent(format!(
                        "option `{}` of `{}` is not an integer",
                        option.name, name
                    )));
                }
            },
            Some(other) => {
                return Err(BotError::MalformedEvent(format!(
                    "option `{}` of `{}` has unsupported value {}",
                    option.name, name, other
                )));
            }
            None => {
                return Err(BotError::MalformedEvent(format!(
                    "option `{}` of `{}` has no value",
                    option.name, name
                )));
            }
        };
        args = args.with(option.name, value);
    }

    Ok(InteractionEvent::Command { name, args })
}

// Format: poll:<poll_id>:<option label>; the label may itself contain ':'
fn decode_component(custom_id: &str) -> Result<InteractionEvent, BotError> {
    let mut parts = custom_id.splitn(3, ':');
    let (Some(prefix), Some(poll_id), Some(label)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(BotError::MalformedEvent(format!(
            "component id `{}` is not a poll action",
            custom_id
        )));
    };

    if prefix != POLL_ACTION_PREFIX || poll_id.is_empty() || label.is_empty() {
        return Err(BotError::MalformedEvent(format!(
            "component id `{}` is not a poll action",
            custom_id
        )));
    }

    Ok(InteractionEvent::ComponentAction {
        kind: ActionKind::PollVote,
        correlation_id: PollId::from(poll_id),
        payload: label.to_string(),
    })
}

pub fn poll_custom_id(poll_id: &PollId, label: &str) -> String {
    format!("{}:{}:{}", POLL_ACTION_PREFIX, poll_id, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(name: &str, value: Option<Value>) -> RawOption {
        RawOption {
            name: name.to_string(),
            value,
        }
    }

    #[test]
    fn decodes_command_arguments() {
        let event = decode(RawEvent::SlashCommand {
            name: "pomodoro".to_string(),
            options: vec![option("work", Some(json!(50))), option("note", Some(json!("hi")))],
        })
        .unwrap();

        let InteractionEvent::Command { name, args } = event else {
            panic!("expected a command");
        };
        assert_eq!(name, "pomodoro");
        assert_eq!(args.integer("work").unwrap(), Some(50));
        assert_eq!(args.required_text("note").unwrap(), "hi");
        assert_eq!(args.integer("break").unwrap(), None);
    }

    #[test]
    fn option_without_value_is_malformed() {
        let err = decode(RawEvent::SlashCommand {
            name: "say".to_string(),
            options: vec![option("content", None)],
        })
        .unwrap_err();
        assert!(matches!(err, BotError::MalformedEvent(_)));
    }

    #[test]
    fn empty_command_name_is_malformed() {
        let err = decode(RawEvent::SlashCommand {
            name: " ".to_string(),
            options: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, BotError::MalformedEvent(_)));
    }

    #[test]
    fn decodes_poll_action_with_colon_in_label() {
        let event = decode(RawEvent::Component {
            custom_id: "poll:abc123:Meet at 12:30".to_string(),
        })
        .unwrap();

        assert_eq!(
            event,
            InteractionEvent::ComponentAction {
                kind: ActionKind::PollVote,
                correlation_id: PollId::from("abc123"),
                payload: "Meet at 12:30".to_string(),
            }
        );
    }

    #[test]
    fn rejects_foreign_component_ids() {
        for custom_id in ["vote_button", "poll:abc", "poll::Pizza", "poll:abc:", "star:abc:Pizza"] {
            let err = decode(RawEvent::Component {
                custom_id: custom_id.to_string(),
            })
            .unwrap_err();
            assert!(matches!(err, BotError::MalformedEvent(_)), "{custom_id}");
        }
    }

    #[test]
    fn custom_id_round_trips_through_decoder() {
        let id = PollId::from("f00d");
        let event = decode(RawEvent::Component {
            custom_id: poll_custom_id(&id, "Sushi"),
        })
        .unwrap();
        assert!(matches!(
            event,
            InteractionEvent::ComponentAction { correlation_id, payload, .. }
                if correlation_id == id && payload == "Sushi"
        ));
    }

    #[test]
    fn user_argument_must_be_a_snowflake() {
        let args = Args::new().with("user", ArgValue::Text("1234".to_string()));
        assert_eq!(args.user("user").unwrap(), Some(1234));

        let args = Args::new().with("user", ArgValue::Text("someone".to_string()));
        assert!(matches!(args.user("user"), Err(BotError::InvalidArgument { .. })));
    }
}
