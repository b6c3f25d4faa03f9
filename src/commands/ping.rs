use async_trait::async_trait;

use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::reply::{Outcome, ReplyPayload};

pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn handle(
        &self,
        _ctx: &HandlerContext,
        _invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        // Latency is the round trip of the deferred acknowledgement.
        Ok(Outcome::deferred(true, |receipt| async move {
            vec![ReplyPayload::private(format!(
                "Pong! Latency is {}ms",
                receipt.latency.as_millis()
            ))]
        }))
    }
}
