use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::reply::{Outcome, ReplyPayload};

const DEFAULT_WORK_MINUTES: i64 = 25;
const DEFAULT_BREAK_MINUTES: i64 = 5;
const MAX_MINUTES: i64 = 24 * 60;

pub struct PomodoroCommand;

#[async_trait]
impl CommandHandler for PomodoroCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let work = minutes(invocation, "work", DEFAULT_WORK_MINUTES)?;
        let rest = minutes(invocation, "break", DEFAULT_BREAK_MINUTES)?;
        let user_id = invocation.caller.user_id;

        let platform = Arc::clone(&ctx.platform);
        ctx.state.scheduler.schedule_after(
            Duration::from_secs(work * 60),
            format!("pomodoro break for {}", user_id),
            async move {
                platform
                    .send_direct_message(
                        user_id,
                        &format!(
                            "⏰ Time's up! Take a **{}-minute** break. You've earned it!",
                            rest
                        ),
                    )
                    .await
            },
        )?;

        let platform = Arc::clone(&ctx.platform);
        ctx.state.scheduler.schedule_after(
            Duration::from_secs((work + rest) * 60),
            format!("pomodoro resume for {}", user_id),
            async move {
                platform
                    .send_direct_message(user_id, "👍 Break's over! Time to get back to it.")
                    .await
            },
        )?;

        Ok(Outcome::Immediate(ReplyPayload::private(format!(
            "🍅 Pomodoro timer started! Time to focus for **{} minutes**. I'll let you know when it's time for a break.",
            work
        ))))
    }
}

fn minutes(invocation: &Invocation, name: &str, default: i64) -> Result<u64, BotError> {
    let value = invocation.args.integer(name)?.unwrap_or(default);
    if !(1..=MAX_MINUTES).contains(&value) {
        return Err(BotError::InvalidArgument {
            name: name.to_string(),
            reason: format!("must be between 1 and {} minutes", MAX_MINUTES),
        });
    }
    Ok(value as u64)
}
