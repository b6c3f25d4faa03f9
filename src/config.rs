use log::warn;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_AI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_AI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_POLL_TTL_HOURS: u64 = 168;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    pub token: String,
    pub port: u16,
    /// `None` when no usable key was provided.
    pub ai: Option<AiSettings>,
    pub owner_id: Option<u64>,
    /// `None` disables poll expiry.
    pub poll_ttl: Option<Duration>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = non_empty("BOT_TOKEN")
            .or_else(|| non_empty("DISCORD_BOT_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let ai = non_empty("AI_API_KEY")
            .or_else(|| non_empty("GEMINI_API_KEY"))
            .filter(|key| !is_placeholder(key))
            .map(|api_key| AiSettings {
                api_key,
                endpoint: non_empty("AI_API_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_AI_URL.to_string()),
                model: non_empty("AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.to_string()),
            });

        let owner_id = non_empty("OWNER_ID").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("OWNER_ID `{}` is not a user id, owner commands are disabled", raw);
                None
            }
        });

        let ttl_hours = match non_empty("POLL_TTL_HOURS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                key: "POLL_TTL_HOURS",
                value: raw,
            })?,
            None => DEFAULT_POLL_TTL_HOURS,
        };
        let poll_ttl = (ttl_hours > 0).then(|| Duration::from_secs(ttl_hours * 60 * 60));

        Ok(Self {
            token,
            port,
            ai,
            owner_id,
            poll_ttl,
        })
    }
}

// Matches the YOUR_..._HERE values shipped in sample .env files.
fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("YOUR_") && value.ends_with("_HERE")
}
