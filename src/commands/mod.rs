mod ask;
mod join;
mod leave;
mod ping;
mod poll;
mod pomodoro;
mod say;
mod userinfo;

use std::sync::Arc;

use crate::dispatch::CommandRegistry;
use crate::error::BotError;

pub use ask::AskCommand;
pub use join::JoinCommand;
pub use leave::{LeaveByIdCommand, LeaveCommand};
pub use ping::PingCommand;
pub use poll::PollCommand;
pub use pomodoro::PomodoroCommand;
pub use say::SayCommand;
pub use userinfo::UserInfoCommand;

pub const GUILD_ONLY_NOTICE: &str = "This command can only be used in a server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamDefinition>,
    pub admin_only: bool,
}

const fn param(
    name: &'static str,
    description: &'static str,
    kind: ParamKind,
    required: bool,
) -> ParamDefinition {
    ParamDefinition {
        name,
        description,
        kind,
        required,
    }
}

fn command(
    name: &'static str,
    description: &'static str,
    params: Vec<ParamDefinition>,
) -> CommandDefinition {
    CommandDefinition {
        name,
        description,
        params,
        admin_only: false,
    }
}

/// Everything the bot registers with the platform at startup.
pub fn definitions() -> Vec<CommandDefinition> {
    vec![
        command("ping", "Replies with Pong!", vec![]),
        command(
            "say",
            "Makes the bot say what you tell it to",
            vec![param("content", "What the bot should say", ParamKind::String, true)],
        ),
        CommandDefinition {
            admin_only: true,
            ..command("leave", "Makes the bot leave the server", vec![])
        },
        command(
            "leave-by-id",
            "Makes the bot leave a specific server (owner only)",
            vec![param("server_id", "The ID of the server to leave", ParamKind::String, true)],
        ),
        command(
            "userinfo",
            "Get information about a user",
            vec![param("user", "The user to get info about", ParamKind::User, false)],
        ),
        command(
            "poll",
            "Create a poll with up to 4 options",
            vec![
                param("question", "The poll question", ParamKind::String, true),
                param("option1", "First choice", ParamKind::String, true),
                param("option2", "Second choice", ParamKind::String, true),
                param("option3", "Third choice", ParamKind::String, false),
                param("option4", "Fourth choice", ParamKind::String, false),
            ],
        ),
        command(
            "ask",
            "Ask the AI a question",
            vec![param("question", "The question you want to ask", ParamKind::String, true)],
        ),
        command(
            "pomodoro",
            "Starts a Pomodoro timer",
            vec![
                param("work", "Work duration in minutes (default 25)", ParamKind::Integer, false),
                param("break", "Break duration in minutes (default 5)", ParamKind::Integer, false),
            ],
        ),
        command("join", "Makes the bot join your current voice channel", vec![]),
    ]
}

pub fn build_registry() -> Result<CommandRegistry, BotError> {
    let mut registry = CommandRegistry::new();
    registry.register("ping", Arc::new(PingCommand))?;
    registry.register("say", Arc::new(SayCommand))?;
    registry.register("leave", Arc::new(LeaveCommand))?;
    registry.register("leave-by-id", Arc::new(LeaveByIdCommand))?;
    registry.register("userinfo", Arc::new(UserInfoCommand))?;
    registry.register("poll", Arc::new(PollCommand))?;
    registry.register("ask", Arc::new(AskCommand))?;
    registry.register("pomodoro", Arc::new(PomodoroCommand))?;
    registry.register("join", Arc::new(JoinCommand))?;
    Ok(registry)
}
