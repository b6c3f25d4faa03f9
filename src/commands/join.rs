use async_trait::async_trait;
use log::info;

use super::GUILD_ONLY_NOTICE;
use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::reply::{Outcome, ReplyPayload};

pub const NOT_IN_VOICE_NOTICE: &str = "You must be in a voice channel to use this command.";

pub struct JoinCommand;

#[async_trait]
impl CommandHandler for JoinCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let Some(guild_id) = invocation.caller.guild_id else {
            return Ok(Outcome::Immediate(ReplyPayload::private(GUILD_ONLY_NOTICE)));
        };
        let Some(channel) = ctx
            .platform
            .voice_channel_of(guild_id, invocation.caller.user_id)
            .await
        else {
            return Ok(Outcome::Immediate(ReplyPayload::private(NOT_IN_VOICE_NOTICE)));
        };

        ctx.platform.join_voice(guild_id, channel.channel_id).await?;
        info!("Joined voice channel {} in guild {}", channel.channel_id, guild_id);
        Ok(Outcome::Immediate(ReplyPayload::text(format!(
            "✅ Joined `{}`",
            channel.name
        ))))
    }
}
