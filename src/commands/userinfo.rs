use async_trait::async_trait;
use log::warn;

use super::GUILD_ONLY_NOTICE;
use crate::dispatch::{CommandHandler, HandlerContext, Invocation};
use crate::error::BotError;
use crate::platform::MemberProfile;
use crate::reply::{EmbedField, EmbedFooter, EmbedView, Outcome, ReplyPayload};

pub const LOOKUP_FAILED_NOTICE: &str = "Could not retrieve user information. Please try again.";

pub struct UserInfoCommand;

#[async_trait]
impl CommandHandler for UserInfoCommand {
    async fn handle(
        &self,
        ctx: &HandlerContext,
        invocation: &Invocation,
    ) -> Result<Outcome, BotError> {
        let Some(guild_id) = invocation.caller.guild_id else {
            return Ok(Outcome::Immediate(ReplyPayload::private(GUILD_ONLY_NOTICE)));
        };
        let target = invocation
            .args
            .user("user")?
            .unwrap_or(invocation.caller.user_id);

        match ctx.platform.member_profile(guild_id, target).await {
            Ok(profile) => Ok(Outcome::Immediate(ReplyPayload::embed(profile_embed(
                &profile, invocation,
            )))),
            Err(e) => {
                warn!("Could not load member {} in guild {}: {}", target, guild_id, e);
                Ok(Outcome::Immediate(ReplyPayload::private(LOOKUP_FAILED_NOTICE)))
            }
        }
    }
}

fn profile_embed(profile: &MemberProfile, invocation: &Invocation) -> EmbedView {
    let roles = if profile.roles.is_empty() {
        "No roles".to_string()
    } else {
        profile.roles.join(", ")
    };
    let field = |name: &str, value: String, inline: bool| EmbedField {
        name: name.to_string(),
        value,
        inline,
    };

    EmbedView {
        title: Some(format!("User Info for {}", profile.username)),
        description: None,
        colour: profile.colour,
        thumbnail: Some(profile.avatar_url.clone()),
        fields: vec![
            field("Username", profile.tag.clone(), true),
            field("Nickname", profile.display_name.clone(), true),
            field("User ID", profile.user_id.to_string(), true),
            field(
                "Account Created",
                profile.created_at.format("%b %d, %Y").to_string(),
                true,
            ),
            field("Roles", roles, false),
        ],
        footer: Some(EmbedFooter {
            text: format!("Requested by {}", invocation.caller.name),
            icon_url: invocation.caller.avatar_url.clone(),
        }),
    }
}
