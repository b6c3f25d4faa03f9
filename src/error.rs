use thiserror::Error;

use crate::models::PollId;

/// Failures raised by the poll store and the poll controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("a poll needs between 2 and 4 options, got {0}")]
    InvalidOptionCount(usize),
    #[error("option `{0}` appears more than once")]
    DuplicateOption(String),
    #[error("option `{label}` is invalid: {reason}")]
    InvalidOption { label: String, reason: String },
    #[error("poll `{0}` does not exist")]
    PollNotFound(PollId),
    #[error("user {voter_id} has already voted in poll `{poll_id}`")]
    AlreadyVoted { poll_id: PollId, voter_id: u64 },
    #[error("poll `{poll_id}` has no option `{label}`")]
    UnknownOption { poll_id: PollId, label: String },
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("command `{0}` is already registered")]
    DuplicateCommand(String),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error("missing argument `{0}`")]
    MissingArgument(String),
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("platform request failed: {0}")]
    Platform(String),
    #[error("AI request failed: {0}")]
    Ai(String),
    #[error("scheduler is no longer running")]
    SchedulerStopped,
}

impl BotError {
    /// Text shown to the user when this error ends a handler.
    pub fn user_message(&self) -> String {
        match self {
            BotError::UnknownCommand(_) => "Error: Unknown command".to_string(),
            BotError::Poll(PollError::InvalidOptionCount(_)) => {
                "A poll needs between 2 and 4 options.".to_string()
            }
            BotError::Poll(PollError::DuplicateOption(label)) => {
                format!("Each poll option must be unique (`{}` was repeated).", label)
            }
            BotError::Poll(PollError::InvalidOption { label, reason }) => {
                format!("Option `{}` can't be used: {}.", label, reason)
            }
            BotError::Poll(PollError::AlreadyVoted { .. }) => {
                "You have already voted in this poll!".to_string()
            }
            BotError::Poll(_) => "Sorry, that vote could not be recorded.".to_string(),
            BotError::MissingArgument(name) => format!("Missing required option `{}`.", name),
            BotError::InvalidArgument { name, reason } => {
                format!("Invalid value for `{}`: {}.", name, reason)
            }
            BotError::PermissionDenied(_) => {
                "You do not have permission to use this command.".to_string()
            }
            _ => "Something went wrong while handling that command.".to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOT_TOKEN environment variable not set")]
    MissingToken,
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
