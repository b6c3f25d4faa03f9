//! Command registry and event dispatch.
//!
//! Every handler runs behind `catch_unwind`, and every error it returns is
//! turned into an ephemeral reply here, so one bad command never takes the
//! gateway loop down with it.

use async_trait::async_trait;
use futures::FutureExt;
use log::{error, info, warn};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::error::BotError;
use crate::interaction::{ActionKind, Args, Caller, Envelope, InteractionEvent};
use crate::platform::Platform;
use crate::reply::{ComponentOutcome, Outcome, ReplyPayload};
use crate::state::AppState;

pub const UNKNOWN_COMMAND_NOTICE: &str = "Error: Unknown command";
pub const HANDLER_FAILED_NOTICE: &str = "Something went wrong while handling that command.";

/// What a handler can reach while it runs.
#[derive(Clone)]
pub struct HandlerContext {
    pub state: Arc<AppState>,
    pub platform: Arc<dyn Platform>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Args,
    pub caller: Caller,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &HandlerContext, invocation: &Invocation)
    -> Result<Outcome, BotError>;
}

#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), BotError> {
        let name = name.into();
        if self.handlers.contains_key(&name) {
            return Err(BotError::DuplicateCommand(name));
        }
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug)]
pub enum Dispatched {
    Command(Outcome),
    Component(ComponentOutcome),
}

pub struct Dispatcher {
    registry: CommandRegistry,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, ctx: &HandlerContext, envelope: Envelope) -> Dispatched {
        let Envelope { caller, event } = envelope;
        match event {
            InteractionEvent::Command { name, args } => {
                let invocation = Invocation { name, args, caller };
                Dispatched::Command(self.dispatch_command(ctx, invocation).await)
            }
            InteractionEvent::ComponentAction {
                kind: ActionKind::PollVote,
                correlation_id,
                payload,
            } => Dispatched::Component(ctx.state.polls.handle_vote_action(
                &correlation_id,
                caller.user_id,
                &payload,
            )),
        }
    }

    pub async fn dispatch_command(&self, ctx: &HandlerContext, invocation: Invocation) -> Outcome {
        info!(
            "Received command: {} from user {}",
            invocation.name, invocation.caller.user_id
        );

        let Some(handler) = self.registry.get(&invocation.name) else {
            warn!("No handler registered for command `{}`", invocation.name);
            return Outcome::Immediate(ReplyPayload::private(UNKNOWN_COMMAND_NOTICE));
        };

        let result = AssertUnwindSafe(handler.handle(ctx, &invocation))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!("Command `{}` failed: {}", invocation.name, e);
                Outcome::Immediate(ReplyPayload::private(e.user_message()))
            }
            Err(_) => {
                error!("Command `{}` panicked", invocation.name);
                Outcome::Immediate(ReplyPayload::private(HANDLER_FAILED_NOTICE))
            }
        }
    }
}
