//! Bot state shared across all event handlers and the sweep scheduler.
//!
//! `BotState` is created once at startup from configuration and cloned into the event handler
//! and the scheduler. Every field is cheap to clone and clones share the same underlying
//! registry and allow-list.

use serenity::all::{Cache, Context};
use serenity::http::Http;
use std::sync::Arc;

use crate::{
    config::{Config, NotificationSettings, RoomSettings},
    data::{AccessPolicy, RoomRegistry},
    service::{notifier::ChannelNotifier, platform::SerenityPlatform},
};

#[derive(Clone)]
pub struct BotState {
    /// Registry of managed rooms.
    pub registry: RoomRegistry,

    /// Access allow-list, seeded from configuration and edited by admin commands.
    pub policy: AccessPolicy,

    /// Room lifecycle settings.
    pub rooms: Arc<RoomSettings>,

    /// Log channel settings for the notifier.
    pub notifications: NotificationSettings,
}

impl BotState {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: RoomRegistry::new(),
            policy: AccessPolicy::new(config.allowed_role_ids.iter().copied()),
            rooms: Arc::new(config.rooms.clone()),
            notifications: config.notifications.clone(),
        }
    }

    /// Platform and notifier for an event handler.
    pub fn collaborators(&self, ctx: &Context) -> (SerenityPlatform, ChannelNotifier) {
        (
            SerenityPlatform::from_context(ctx),
            ChannelNotifier::from_context(ctx, self.notifications.clone()),
        )
    }

    /// Platform and notifier for work outside of an event, such as the scheduled sweep.
    pub fn detached_collaborators(
        &self,
        http: Arc<Http>,
        cache: Arc<Cache>,
    ) -> (SerenityPlatform, ChannelNotifier) {
        (
            SerenityPlatform::new(http.clone(), cache.clone()),
            ChannelNotifier::new(http, cache, self.notifications.clone()),
        )
    }
}
