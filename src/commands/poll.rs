use async_trait::async_trait;

use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::models::MAX_POLL_OPTIONS;
use crate::reply::Outcome;

pub struct PollCommand;

#[async_trait]
impl CommandHandler for PollCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let question = invocation.args.required_text("question")?;

        let mut options = Vec::with_capacity(MAX_POLL_OPTIONS);
        for i in 1..=MAX_POLL_OPTIONS {
            if let Some(option) = invocation.args.text(&format!("option{}", i))? {
                options.push(option.to_string());
            }
        }

        let payload = ctx.state.polls.publish(question, options)?;
        Ok(Outcome::Immediate(payload))
    }
}
