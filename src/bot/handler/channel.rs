//! Channel event handlers.
//!
//! A managed room deleted by hand (or by another bot) must leave the registry too, otherwise
//! the registry would track a room that no longer exists.

use serenity::all::{Context, GuildChannel, Message};

use crate::{service::room::VoiceRoomService, state::BotState};

/// Handles the channel_delete event when a channel is deleted in a guild.
///
/// Removes the registry entry if the channel was a managed room. No platform call is made.
///
/// # Arguments
/// - `state` - Shared bot state holding the registry
/// - `ctx` - Discord context for the service's collaborators
/// - `channel` - The deleted guild channel
/// - `_messages` - Cached messages of the channel (unused)
pub async fn handle_channel_delete(
    state: &BotState,
    ctx: Context,
    channel: GuildChannel,
    _messages: Option<Vec<Message>>,
) {
    let (platform, notifier) = state.collaborators(&ctx);
    let service = VoiceRoomService::new(
        &platform,
        &notifier,
        &state.registry,
        &state.policy,
        &state.rooms,
    );

    if service.forget(channel.id).await.is_some() {
        tracing::debug!("Deleted channel {} was a managed room", channel.name);
    }
}
