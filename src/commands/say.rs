use async_trait::async_trait;

use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::reply::{Outcome, ReplyPayload};

pub struct SayCommand;

#[async_trait]
impl CommandHandler for SayCommand {
    async fn handle(
        &self,
        _ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let content = invocation.args.required_text("content")?;
        Ok(Outcome::Immediate(ReplyPayload::text(content)))
    }
}
