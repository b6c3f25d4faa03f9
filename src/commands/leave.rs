use async_trait::async_trait;
use log::{error, info, warn};

use super::GUILD_ONLY_NOTICE;
use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::reply::{Outcome, ReplyPayload};

pub const NOT_ADMIN_NOTICE: &str = "You do not have permission to use this command.";
pub const NOT_OWNER_NOTICE: &str = "❌ You do not have permission to use this command.";

/// Leaves the guild the command was used in. Administrators only.
pub struct LeaveCommand;

#[async_trait]
impl CommandHandler for LeaveCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let Some(guild_id) = invocation.caller.guild_id else {
            return Ok(Outcome::Immediate(ReplyPayload::private(GUILD_ONLY_NOTICE)));
        };
        if !invocation.caller.is_admin {
            warn!(
                "User {} tried to remove the bot from guild {} without admin rights",
                invocation.caller.user_id, guild_id
            );
            return Ok(Outcome::Immediate(ReplyPayload::private(NOT_ADMIN_NOTICE)));
        }

        ctx.platform.leave_guild(guild_id).await?;
        info!("Left guild {} at the request of {}", guild_id, invocation.caller.user_id);
        Ok(Outcome::Immediate(ReplyPayload::private("I'm leaving now, goodbye!")))
    }
}

/// Leaves any guild by id. Restricted to the configured owner.
pub struct LeaveByIdCommand;

#[async_trait]
impl CommandHandler for LeaveByIdCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        if ctx.state.config.owner_id != Some(invocation.caller.user_id) {
            warn!(
                "User {} is not the owner and cannot use leave-by-id",
                invocation.caller.user_id
            );
            return Ok(Outcome::Immediate(ReplyPayload::private(NOT_OWNER_NOTICE)));
        }

        let server_id = invocation.args.required_text("server_id")?.trim();
        let not_found = || {
            Outcome::Immediate(ReplyPayload::private(format!(
                "❌ I am not in a server with the ID: {}",
                server_id
            )))
        };

        let Ok(guild_id) = server_id.parse::<u64>() else {
            return Ok(not_found());
        };
        let Some(name) = ctx.platform.guild_name(guild_id).await else {
            return Ok(not_found());
        };

        let reply = match ctx.platform.leave_guild(guild_id).await {
            Ok(()) => {
                info!("Left guild {} ({}) on owner request", guild_id, name);
                format!("✅ Successfully left the server: {}", name)
            }
            Err(e) => {
                error!("Failed to leave guild {}: {}", guild_id, e);
                format!("🔥 Failed to leave the server: {}", name)
            }
        };
        Ok(Outcome::Immediate(ReplyPayload::private(reply)))
    }
}
