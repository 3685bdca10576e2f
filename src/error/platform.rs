use serenity::all::{ChannelId, GuildId};
use thiserror::Error;

/// Failure of a single outbound platform call.
///
/// Each call made through `VoicePlatform` is independently fallible. The room lifecycle
/// decides what a failure means (orphaned room, dangling room, skipped reclaim) based on
/// which step failed.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Discord API error from Serenity, boxed due to its size.
    #[error(transparent)]
    Discord(Box<serenity::Error>),

    /// The room no longer exists on the platform.
    ///
    /// Reclamation treats this as "already deleted".
    #[error("Room {0} does not exist")]
    RoomNotFound(ChannelId),

    /// Guild is not available in the cache, so occupancy cannot be read.
    #[error("Guild {0} is not available in the cache")]
    GuildUnavailable(GuildId),

    /// The platform refused the request for a reason that has no richer representation.
    #[error("{0}")]
    Rejected(String),
}

impl PlatformError {
    /// Whether this error means the room is already gone.
    pub fn is_room_not_found(&self) -> bool {
        matches!(self, Self::RoomNotFound(_))
    }
}

impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        PlatformError::Discord(Box::new(err))
    }
}
