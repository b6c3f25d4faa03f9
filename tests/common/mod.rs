#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use trusty_helper::ai::{Completion, CompletionProvider};
use trusty_helper::config::BotConfig;
use trusty_helper::dispatch::HandlerContext;
use trusty_helper::error::BotError;
use trusty_helper::interaction::{Args, Caller, Envelope, InteractionEvent};
use trusty_helper::platform::{MemberProfile, Platform, VoiceChannelRef};
use trusty_helper::state::AppState;
use trusty_helper::store::PollStore;
use trusty_helper::tasks::scheduler::Scheduler;
use trusty_helper::voting::PollController;

pub const OWNER_ID: u64 = 42;
pub const GUILD_ID: u64 = 9000;

/// Records every side effect instead of talking to a gateway.
#[derive(Default)]
pub struct MockPlatform {
    pub guilds: Mutex<HashMap<u64, String>>,
    pub left: Mutex<Vec<u64>>,
    pub direct_messages: Mutex<Vec<(u64, String)>>,
    pub voice: Mutex<HashMap<u64, VoiceChannelRef>>,
    pub joined: Mutex<Vec<(u64, u64)>>,
}

impl MockPlatform {
    pub fn with_guild(self, guild_id: u64, name: &str) -> Self {
        self.guilds.lock().insert(guild_id, name.to_string());
        self
    }
}

#[async_trait]
impl Platform for MockPlatform {
    async fn guild_name(&self, guild_id: u64) -> Option<String> {
        self.guilds.lock().get(&guild_id).cloned()
    }

    async fn leave_guild(&self, guild_id: u64) -> Result<(), BotError> {
        self.left.lock().push(guild_id);
        Ok(())
    }

    async fn member_profile(&self, _guild_id: u64, user_id: u64) -> Result<MemberProfile, BotError> {
        Ok(MemberProfile {
            user_id,
            username: "ada".to_string(),
            tag: "ada#0001".to_string(),
            display_name: "Ada".to_string(),
            avatar_url: "https://cdn.example/ada.png".to_string(),
            created_at: Utc.with_ymd_and_hms(2016, 4, 30, 11, 18, 25).unwrap(),
            roles: vec!["@Mods".to_string()],
            colour: None,
        })
    }

    async fn voice_channel_of(&self, _guild_id: u64, user_id: u64) -> Option<VoiceChannelRef> {
        self.voice.lock().get(&user_id).cloned()
    }

    async fn join_voice(&self, guild_id: u64, channel_id: u64) -> Result<(), BotError> {
        self.joined.lock().push((guild_id, channel_id));
        Ok(())
    }

    async fn send_direct_message(&self, user_id: u64, content: &str) -> Result<(), BotError> {
        self.direct_messages.lock().push((user_id, content.to_string()));
        Ok(())
    }
}

/// Always answers with the same completion.
pub struct FixedCompletion(pub Completion);

#[async_trait]
impl CompletionProvider for FixedCompletion {
    async fn complete(&self, _question: &str) -> Result<Completion, BotError> {
        Ok(self.0.clone())
    }
}

pub fn test_config() -> BotConfig {
    BotConfig::from_lookup(|key| match key {
        "BOT_TOKEN" => Some("test-token".to_string()),
        "OWNER_ID" => Some(OWNER_ID.to_string()),
        _ => None,
    })
    .unwrap()
}

pub fn context(
    platform: Arc<MockPlatform>,
    ai: Option<Arc<dyn CompletionProvider>>,
) -> HandlerContext {
    let (scheduler, _worker) = Scheduler::start();
    let state = AppState {
        config: test_config(),
        polls: PollController::new(Arc::new(PollStore::new())),
        scheduler,
        ai,
    };
    HandlerContext {
        state: Arc::new(state),
        platform,
    }
}

pub fn caller(user_id: u64) -> Caller {
    Caller {
        user_id,
        name: format!("user-{}", user_id),
        avatar_url: None,
        guild_id: Some(GUILD_ID),
        is_admin: false,
    }
}

pub fn command(caller: Caller, name: &str, args: Args) -> Envelope {
    Envelope {
        caller,
        event: InteractionEvent::Command {
            name: name.to_string(),
            args,
        },
    }
}
