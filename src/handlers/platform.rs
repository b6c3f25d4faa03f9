use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::prelude::*;

use crate::error::BotError;
use crate::platform::{MemberProfile, Platform, VoiceChannelRef};

// First millisecond of 2015, the epoch Discord snowflakes count from.
const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// `Platform` backed by a serenity context: cache reads plus HTTP calls.
pub struct SerenityPlatform {
    ctx: Context,
}

impl SerenityPlatform {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

fn platform_error(error: serenity::Error) -> BotError {
    BotError::Platform(error.to_string())
}

pub fn snowflake_created_at(id: u64) -> DateTime<Utc> {
    let millis = (id >> 22) as i64 + DISCORD_EPOCH_MS;
    DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default()
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn guild_name(&self, guild_id: u64) -> Option<String> {
        self.ctx.cache.guild(GuildId(guild_id)).map(|guild| guild.name)
    }

    async fn leave_guild(&self, guild_id: u64) -> Result<(), BotError> {
        GuildId(guild_id)
            .leave(&self.ctx.http)
            .await
            .map_err(platform_error)
    }

    async fn member_profile(&self, guild_id: u64, user_id: u64) -> Result<MemberProfile, BotError> {
        let guild = GuildId(guild_id);
        let member = guild
            .member(&self.ctx, UserId(user_id))
            .await
            .map_err(platform_error)?;
        let guild_roles = guild.roles(&self.ctx.http).await.map_err(platform_error)?;

        let mut roles: Vec<_> = member
            .roles
            .iter()
            .filter_map(|role_id| guild_roles.get(role_id))
            .collect();
        roles.sort_by(|a, b| b.position.cmp(&a.position));

        Ok(MemberProfile {
            user_id,
            username: member.user.name.clone(),
            tag: member.user.tag(),
            display_name: member.display_name().into_owned(),
            avatar_url: member.user.face(),
            created_at: snowflake_created_at(user_id),
            roles: roles.into_iter().map(|role| role.name.clone()).collect(),
            colour: member.colour(&self.ctx.cache).map(|colour| colour.0),
        })
    }

    async fn voice_channel_of(&self, guild_id: u64, user_id: u64) -> Option<VoiceChannelRef> {
        let guild = self.ctx.cache.guild(GuildId(guild_id))?;
        let channel_id = guild.voice_states.get(&UserId(user_id))?.channel_id?;
        let name = channel_id
            .to_channel_cached(&self.ctx.cache)
            .and_then(|channel| channel.guild())
            .map(|channel| channel.name)
            .unwrap_or_else(|| channel_id.to_string());

        Some(VoiceChannelRef {
            channel_id: channel_id.0,
            name,
        })
    }

    async fn join_voice(&self, guild_id: u64, channel_id: u64) -> Result<(), BotError> {
        let manager = songbird::get(&self.ctx)
            .await
            .ok_or_else(|| BotError::Platform("voice client is not registered".to_string()))?;

        let (_call, joined) = manager
            .join_gateway(GuildId(guild_id), ChannelId(channel_id))
            .await;
        let info = joined.map_err(|e| BotError::Platform(e.to_string()))?;
        debug!("Voice session for guild {} established at {}", guild_id, info.endpoint);
        Ok(())
    }

    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<(), BotError> {
        let channel = UserId(user_id)
            .create_dm_channel(&self.ctx)
            .await
            .map_err(platform_error)?;
        channel
            .say(&self.ctx.http, content)
            .await
            .map_err(platform_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_timestamp_is_decoded() {
        // Example id from the Discord developer documentation.
        let created = snowflake_created_at(175928847299117063);
        assert_eq!(created.to_rfc3339(), "2016-04-30T11:18:25.796+00:00");
    }
}
