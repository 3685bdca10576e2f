use serenity::all::{ChannelId, RoleId};
use std::time::Duration;

use crate::{
    error::{config::ConfigError, AppError},
    util::parse::{parse_u64_from_string, parse_u64_list},
};

const DEFAULT_ROOM_NAME_TEMPLATE: &str = "{role}'s VC";
const DEFAULT_LOG_CHANNEL_PATTERN: &str = "logs";
const DEFAULT_SWEEP_SCHEDULE: &str = "0 */15 * * * *";
/// Discord's maximum voice channel user limit.
const MAX_ROOM_USER_LIMIT: u32 = 99;

/// Settings consumed by the room lifecycle.
#[derive(Debug, Clone)]
pub struct RoomSettings {
    /// Joining this voice room provisions a new managed room.
    pub lobby_channel_id: ChannelId,
    /// Category new rooms are created under. When unset, the lobby's own category is used.
    pub category_id: Option<ChannelId>,
    /// Occupancy cap for new rooms, `None` for unlimited.
    pub user_limit: Option<u32>,
    /// Owning role used when the actor has no role other than @everyone.
    pub default_role_id: Option<RoleId>,
    /// Room name template with `{role}` and `{user}` placeholders.
    pub name_template: String,
    /// Wait applied before checking occupancy on departure. Zero checks immediately.
    pub reclaim_delay: Duration,
}

/// Settings consumed by the notifier.
#[derive(Debug, Clone)]
pub struct NotificationSettings {
    /// Explicitly configured log channel.
    pub log_channel_id: Option<ChannelId>,
    /// Case-insensitive substring matched against text channel names when no log channel is
    /// configured.
    pub log_channel_pattern: String,
}

pub struct Config {
    pub discord_bot_token: String,

    pub rooms: RoomSettings,
    pub notifications: NotificationSettings,

    /// Initial access allow-list. Empty means everyone may create rooms.
    pub allowed_role_ids: Vec<RoleId>,

    /// Cron expression for the periodic sweep, `None` when disabled.
    pub sweep_schedule: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::from_lookup(|name| std::env::var(name).ok())?)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let discord_bot_token = var("DISCORD_BOT_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?;

        let lobby_channel_id = var("LOBBY_CHANNEL_ID")
            .ok_or_else(|| ConfigError::MissingEnvVar("LOBBY_CHANNEL_ID".to_string()))
            .and_then(|value| parse_id("LOBBY_CHANNEL_ID", &value))
            .map(ChannelId::new)?;

        let category_id = optional_id(&var, "ROOM_CATEGORY_ID")?.map(ChannelId::new);
        let default_role_id = optional_id(&var, "DEFAULT_ROLE_ID")?.map(RoleId::new);
        let log_channel_id = optional_id(&var, "LOG_CHANNEL_ID")?.map(ChannelId::new);

        let user_limit = match var("ROOM_USER_LIMIT") {
            None => None,
            Some(value) => {
                let limit = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| invalid("ROOM_USER_LIMIT", &value, e.to_string()))?;
                if limit > MAX_ROOM_USER_LIMIT {
                    return Err(invalid(
                        "ROOM_USER_LIMIT",
                        &value,
                        format!("must be at most {}", MAX_ROOM_USER_LIMIT),
                    ));
                }
                (limit > 0).then_some(limit)
            }
        };

        let reclaim_delay = match var("RECLAIM_DELAY_SECONDS") {
            None => Duration::ZERO,
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| invalid("RECLAIM_DELAY_SECONDS", &value, e.to_string()))?,
        };

        let allowed_role_ids = match var("ALLOWED_ROLE_IDS") {
            None => Vec::new(),
            Some(value) => parse_u64_list(&value)
                .map_err(|e| invalid("ALLOWED_ROLE_IDS", &value, e.to_string()))?
                .into_iter()
                .map(RoleId::new)
                .collect(),
        };

        let sweep_schedule = match var("SWEEP_SCHEDULE") {
            None => Some(DEFAULT_SWEEP_SCHEDULE.to_string()),
            Some(value) if value.trim().eq_ignore_ascii_case("off") => None,
            Some(value) => Some(value.trim().to_string()),
        };

        Ok(Self {
            discord_bot_token,
            rooms: RoomSettings {
                lobby_channel_id,
                category_id,
                user_limit,
                default_role_id,
                name_template: var("ROOM_NAME_TEMPLATE")
                    .unwrap_or_else(|| DEFAULT_ROOM_NAME_TEMPLATE.to_string()),
                reclaim_delay,
            },
            notifications: NotificationSettings {
                log_channel_id,
                log_channel_pattern: var("LOG_CHANNEL_PATTERN")
                    .map(|pattern| pattern.trim().to_string())
                    .unwrap_or_else(|| DEFAULT_LOG_CHANNEL_PATTERN.to_string()),
            },
            allowed_role_ids,
            sweep_schedule,
        })
    }
}

fn invalid(name: &str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar {
        name: name.to_string(),
        value: value.to_string(),
        reason,
    }
}

fn parse_id(name: &str, value: &str) -> Result<u64, ConfigError> {
    parse_u64_from_string(value).map_err(|e| invalid(name, value, e.to_string()))
}

fn optional_id<F>(var: &F, name: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(name).map(|value| parse_id(name, &value)).transpose()
}
