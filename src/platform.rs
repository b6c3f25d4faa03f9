use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::BotError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub user_id: u64,
    pub username: String,
    pub tag: String,
    pub display_name: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
    pub roles: Vec<String>,
    pub colour: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceChannelRef {
    pub channel_id: u64,
    pub name: String,
}

/// Side effects handlers may perform against the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Name of a guild the bot is currently in, if any.
    async fn guild_name(&self, guild_id: u64) -> Option<String>;

    async fn leave_guild(&self, guild_id: u64) -> Result<(), BotError>;

    async fn member_profile(&self, guild_id: u64, user_id: u64) -> Result<MemberProfile, BotError>;

    /// The voice channel a member currently sits in.
    async fn voice_channel_of(&self, guild_id: u64, user_id: u64) -> Option<VoiceChannelRef>;

    async fn join_voice(&self, guild_id: u64, channel_id: u64) -> Result<(), BotError>;

    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<(), BotError>;
}
