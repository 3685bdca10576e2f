//! Best-effort lifecycle notifications.
//!
//! The lifecycle announces outcomes through the `Notifier` trait. Delivery never affects the
//! lifecycle action that triggered it: a failed announcement is logged locally and reported as
//! `false`.

use serenity::all::{
    Cache, ChannelId, ChannelType, Context, CreateEmbed, CreateMessage, GuildId, Timestamp,
    UserId,
};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::{config::NotificationSettings, model::event::RoomEvent};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Posts a lifecycle event to the operator log channel.
    ///
    /// # Returns
    /// - `true` - The notification was delivered
    /// - `false` - No log channel could be resolved, or delivery failed
    async fn announce(&self, event: &RoomEvent) -> bool;

    /// Sends a private message to a member.
    ///
    /// # Returns
    /// - `true` - The message was delivered
    /// - `false` - Delivery failed (e.g. the member has DMs disabled)
    async fn notify_member(&self, user_id: UserId, content: &str) -> bool;
}

/// Picks the log channel for a guild.
///
/// Priority: the explicitly configured channel, then the first text channel (by position,
/// then id) whose name contains `pattern` case-insensitively. `None` means notifications are
/// skipped.
///
/// # Arguments
/// - `configured` - Explicitly configured log channel
/// - `pattern` - Name pattern; an empty pattern never matches
/// - `channels` - Known guild channels as `(id, name, kind, position)`
pub fn resolve_log_channel<'a>(
    configured: Option<ChannelId>,
    pattern: &str,
    channels: impl IntoIterator<Item = (ChannelId, &'a str, ChannelType, u16)>,
) -> Option<ChannelId> {
    if configured.is_some() {
        return configured;
    }

    if pattern.is_empty() {
        return None;
    }

    let pattern = pattern.to_lowercase();

    channels
        .into_iter()
        .filter(|(_, name, kind, _)| {
            *kind == ChannelType::Text && name.to_lowercase().contains(&pattern)
        })
        .min_by_key(|(id, _, _, position)| (*position, *id))
        .map(|(id, _, _, _)| id)
}

/// `Notifier` that posts embeds to a Discord text channel and DMs members.
pub struct ChannelNotifier {
    http: Arc<Http>,
    cache: Arc<Cache>,
    settings: NotificationSettings,
}

impl ChannelNotifier {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, settings: NotificationSettings) -> Self {
        Self {
            http,
            cache,
            settings,
        }
    }

    pub fn from_context(ctx: &Context, settings: NotificationSettings) -> Self {
        Self::new(ctx.http.clone(), ctx.cache.clone(), settings)
    }

    /// Resolves the log channel from the cached guild channel list.
    fn log_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        if let Some(channel_id) = self.settings.log_channel_id {
            return Some(channel_id);
        }

        let guild = self.cache.guild(guild_id)?;

        resolve_log_channel(
            None,
            &self.settings.log_channel_pattern,
            guild.channels.values().map(|channel| {
                (
                    channel.id,
                    channel.name.as_str(),
                    channel.kind,
                    channel.position,
                )
            }),
        )
    }

    fn build_embed(event: &RoomEvent) -> CreateEmbed {
        let now = chrono::Utc::now();

        let mut embed = CreateEmbed::new()
            .title(event.title())
            .description(event.description())
            .color(event.color());

        // An out-of-range timestamp just omits the footer time
        if let Ok(timestamp) = Timestamp::from_unix_timestamp(now.timestamp()) {
            embed = embed.timestamp(timestamp);
        }

        embed
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn announce(&self, event: &RoomEvent) -> bool {
        let guild_id = event.guild_id();

        let Some(channel_id) = self.log_channel(guild_id) else {
            tracing::debug!(
                "No log channel for guild {}, skipping {:?} notification",
                guild_id,
                event.kind()
            );
            return false;
        };

        let message = CreateMessage::new().embed(Self::build_embed(event));

        match channel_id.send_message(&self.http, message).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    "Failed to post {:?} notification to channel {}: {}",
                    event.kind(),
                    channel_id,
                    e
                );
                false
            }
        }
    }

    async fn notify_member(&self, user_id: UserId, content: &str) -> bool {
        let message = CreateMessage::new().content(content);

        match user_id.direct_message(&self.http, message).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Failed to direct message user {}: {}", user_id, e);
                false
            }
        }
    }
}
