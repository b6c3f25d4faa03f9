use async_trait::async_trait;
use log::error;

use crate::ai::{Completion, raw_response_message, split_answer};
use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::reply::{Outcome, ReplyPayload};

pub const NOT_CONFIGURED_NOTICE: &str =
    "The `/ask` command is not configured. The bot owner needs to provide an AI API key.";

pub struct AskCommand;

#[async_trait]
impl CommandHandler for AskCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let question = invocation.args.required_text("question")?.to_string();
        let provider = ctx.state.ai.clone();

        Ok(Outcome::deferred(false, move |_receipt| async move {
            let Some(provider) = provider else {
                return vec![ReplyPayload::text(NOT_CONFIGURED_NOTICE)];
            };

            match provider.complete(&question).await {
                Ok(Completion::Text(answer)) => split_answer(&question, &answer)
                    .into_iter()
                    .map(ReplyPayload::text)
                    .collect(),
                Ok(Completion::Raw(body)) => vec![ReplyPayload::text(raw_response_message(&body))],
                Err(e) => {
                    error!(
                        "An error occurred while trying to contact the AI for question `{}`: {}",
                        question, e
                    );
                    vec![ReplyPayload::text(format!(
                        "An error occurred while trying to contact the AI: {}",
                        e
                    ))]
                }
            }
        }))
    }
}
