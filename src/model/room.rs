//! Managed room domain models and parameters.

use chrono::{DateTime, Duration, Utc};
use serenity::all::{ChannelId, GuildId, UserId};

/// An ephemeral voice room created by the bot.
///
/// Lives only in the room registry. Entries are inserted once after a successful provision and
/// removed once on reclamation; they are never updated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagedRoom {
    /// Platform id of the voice channel.
    pub room_id: ChannelId,
    /// Guild the room was created in.
    pub guild_id: GuildId,
    /// Member who joined the lobby and triggered creation.
    pub owner_id: UserId,
    /// Label of the owning role at creation time, used for naming and statistics.
    pub owning_role_label: String,
    /// When the room was registered.
    pub created_at: DateTime<Utc>,
}

impl ManagedRoom {
    /// How long the room has existed as of `now`.
    pub fn lifetime(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

/// Parameters for creating a new voice room on the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateVoiceRoomParam {
    pub guild_id: GuildId,
    pub name: String,
    /// Category to create the room under, if any.
    pub category_id: Option<ChannelId>,
    /// Occupancy cap, `None` for unlimited.
    pub user_limit: Option<u32>,
}

/// Snapshot of the registry for the admin status report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoomStats {
    /// Number of managed rooms.
    pub total: usize,
    /// Room count per owning role label, sorted by descending count then label.
    pub per_role: Vec<(String, usize)>,
}

/// Result of handling a departure from a managed room.
#[derive(Debug, Clone, PartialEq)]
pub enum ReclaimOutcome {
    /// The room was empty; it has been deleted and unregistered.
    Reclaimed(ManagedRoom),
    /// The room still has occupants and was kept.
    Occupied(usize),
    /// Another handler is already reclaiming this room.
    InProgress,
}

/// Result of an administrative sweep over the whole registry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepReport {
    /// Rooms deleted (or found already gone) and removed from the registry.
    pub reclaimed: Vec<ManagedRoom>,
    /// Empty rooms whose delete failed; unregistered, but still present on the platform.
    pub dangling: Vec<ManagedRoom>,
    /// Rooms kept because they still had occupants.
    pub occupied: usize,
    /// Rooms kept because occupancy could not be read.
    pub failed: usize,
    /// Platform delete calls issued.
    pub delete_calls: usize,
}
