//! Outbound platform operations used by the room lifecycle.
//!
//! `VoicePlatform` is the seam between the lifecycle logic and Discord. The production
//! implementation, `SerenityPlatform`, issues HTTP calls through serenity and reads voice
//! occupancy from the gateway cache.

use serenity::all::{
    Cache, ChannelId, ChannelType, Context, CreateChannel, GuildId, PermissionOverwrite, UserId,
};
use serenity::async_trait;
use serenity::http::Http;
use std::sync::Arc;

use crate::{error::platform::PlatformError, model::room::CreateVoiceRoomParam};

/// HTTP status Discord returns for an unknown channel.
const NOT_FOUND: u16 = 404;

#[async_trait]
pub trait VoicePlatform: Send + Sync {
    /// Category the given channel belongs to, if any.
    async fn room_group(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<ChannelId>, PlatformError>;

    /// Creates a voice room and returns its id.
    async fn create_voice_room(&self, param: CreateVoiceRoomParam)
        -> Result<ChannelId, PlatformError>;

    /// Applies permission overwrites to a room, one call per overwrite.
    async fn edit_room_access(
        &self,
        room_id: ChannelId,
        overwrites: &[PermissionOverwrite],
    ) -> Result<(), PlatformError>;

    /// Moves a member who is connected to voice into the given room.
    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        room_id: ChannelId,
    ) -> Result<(), PlatformError>;

    /// Number of members currently connected to the room.
    async fn room_occupancy(
        &self,
        guild_id: GuildId,
        room_id: ChannelId,
    ) -> Result<usize, PlatformError>;

    /// Deletes the room. Returns `PlatformError::RoomNotFound` if it is already gone.
    async fn delete_room(&self, room_id: ChannelId) -> Result<(), PlatformError>;
}

/// `VoicePlatform` backed by serenity's HTTP client and gateway cache.
///
/// Both fields are reference counted, so constructing one per event is cheap.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>, cache: Arc<Cache>) -> Self {
        Self { http, cache }
    }

    pub fn from_context(ctx: &Context) -> Self {
        Self::new(ctx.http.clone(), ctx.cache.clone())
    }
}

/// Maps "unknown channel" responses to `RoomNotFound` so reclamation can treat them as
/// already deleted.
fn map_room_error(room_id: ChannelId, err: serenity::Error) -> PlatformError {
    if let serenity::Error::Http(http_err) = &err {
        if http_err.status_code().map(|status| status.as_u16()) == Some(NOT_FOUND) {
            return PlatformError::RoomNotFound(room_id);
        }
    }

    PlatformError::from(err)
}

#[async_trait]
impl VoicePlatform for SerenityPlatform {
    async fn room_group(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<ChannelId>, PlatformError> {
        // Guild reference must be dropped before awaiting
        let cached = self.cache.guild(guild_id).and_then(|guild| {
            guild
                .channels
                .get(&channel_id)
                .map(|channel| channel.parent_id)
        });

        if let Some(parent_id) = cached {
            return Ok(parent_id);
        }

        tracing::debug!(
            "Channel {} not cached for guild {}, fetching from API",
            channel_id,
            guild_id
        );

        let channel = channel_id
            .to_channel(&self.http)
            .await
            .map_err(|e| map_room_error(channel_id, e))?;

        Ok(channel.guild().and_then(|channel| channel.parent_id))
    }

    async fn create_voice_room(
        &self,
        param: CreateVoiceRoomParam,
    ) -> Result<ChannelId, PlatformError> {
        let mut builder = CreateChannel::new(param.name).kind(ChannelType::Voice);

        if let Some(category_id) = param.category_id {
            builder = builder.category(category_id);
        }
        if let Some(user_limit) = param.user_limit {
            builder = builder.user_limit(user_limit);
        }

        let channel = param.guild_id.create_channel(&self.http, builder).await?;

        Ok(channel.id)
    }

    async fn edit_room_access(
        &self,
        room_id: ChannelId,
        overwrites: &[PermissionOverwrite],
    ) -> Result<(), PlatformError> {
        for overwrite in overwrites {
            room_id
                .create_permission(&self.http, overwrite.clone())
                .await
                .map_err(|e| map_room_error(room_id, e))?;
        }

        Ok(())
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        room_id: ChannelId,
    ) -> Result<(), PlatformError> {
        guild_id
            .move_member(&self.http, user_id, room_id)
            .await
            .map_err(|e| map_room_error(room_id, e))?;

        Ok(())
    }

    async fn room_occupancy(
        &self,
        guild_id: GuildId,
        room_id: ChannelId,
    ) -> Result<usize, PlatformError> {
        let guild = self
            .cache
            .guild(guild_id)
            .ok_or(PlatformError::GuildUnavailable(guild_id))?;

        // A freshly created room may not be in the channel cache yet, so an unknown room
        // simply counts as empty; a delete of a room that is really gone reports RoomNotFound.
        Ok(guild
            .voice_states
            .values()
            .filter(|state| state.channel_id == Some(room_id))
            .count())
    }

    async fn delete_room(&self, room_id: ChannelId) -> Result<(), PlatformError> {
        room_id
            .delete(&self.http)
            .await
            .map_err(|e| map_room_error(room_id, e))?;

        Ok(())
    }
}
