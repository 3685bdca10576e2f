//! Inbound voice transitions and outbound lifecycle notifications.

use chrono::Duration;
use serenity::all::{ChannelId, GuildId, UserId, VoiceState};

use crate::{
    error::room::PlatformOperation, model::room::ManagedRoom, util::format::format_lifetime,
};

/// A member's move between voice rooms, derived from a voice state update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceTransition {
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// Room the member was in before the update, if any.
    pub before: Option<ChannelId>,
    /// Room the member is in after the update, if any.
    pub after: Option<ChannelId>,
}

impl VoiceTransition {
    /// Builds a transition from serenity's old and new voice states.
    ///
    /// Returns `None` for voice states outside of a guild.
    pub fn from_states(old: Option<&VoiceState>, new: &VoiceState) -> Option<Self> {
        let guild_id = new.guild_id.or_else(|| old.and_then(|state| state.guild_id))?;

        Some(Self {
            guild_id,
            user_id: new.user_id,
            before: old.and_then(|state| state.channel_id),
            after: new.channel_id,
        })
    }

    /// Whether the member actually changed rooms, as opposed to a mute/deafen/stream update.
    pub fn is_room_change(&self) -> bool {
        self.before != self.after
    }

    /// Room the member left, if they left one.
    pub fn departed(&self) -> Option<ChannelId> {
        if self.is_room_change() {
            self.before
        } else {
            None
        }
    }

    /// Whether the member entered the given lobby with this update.
    pub fn entered(&self, lobby_id: ChannelId) -> bool {
        self.is_room_change() && self.after == Some(lobby_id)
    }
}

/// Kind of a lifecycle notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomEventKind {
    Provisioned,
    Reclaimed,
    Denied,
    Orphaned,
    Dangling,
    Unchecked,
    Swept,
}

/// Lifecycle outcome announced to the operator log channel.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// A room was created and registered.
    Provisioned {
        room: ManagedRoom,
        owner_name: String,
    },
    /// An empty room was deleted and unregistered.
    Reclaimed { room: ManagedRoom, lifetime: Duration },
    /// The access policy denied a lobby join.
    Denied {
        guild_id: GuildId,
        user_id: UserId,
        display_name: String,
    },
    /// A platform call failed and left a room the registry does not track.
    Orphaned {
        guild_id: GuildId,
        room_id: ChannelId,
        user_id: UserId,
        operation: PlatformOperation,
        reason: String,
    },
    /// Deleting an empty room failed. The room was unregistered but still exists.
    Dangling { room: ManagedRoom, reason: String },
    /// Occupancy of a managed room could not be read. The room stays registered.
    Unchecked { room: ManagedRoom, reason: String },
    /// An administrative sweep finished in this guild.
    Swept {
        guild_id: GuildId,
        /// Rooms deleted (or found already gone) and unregistered.
        reclaimed: usize,
        /// Rooms kept because their occupancy could not be read.
        unchecked: usize,
    },
}

impl RoomEvent {
    pub fn kind(&self) -> RoomEventKind {
        match self {
            Self::Provisioned { .. } => RoomEventKind::Provisioned,
            Self::Reclaimed { .. } => RoomEventKind::Reclaimed,
            Self::Denied { .. } => RoomEventKind::Denied,
            Self::Orphaned { .. } => RoomEventKind::Orphaned,
            Self::Dangling { .. } => RoomEventKind::Dangling,
            Self::Unchecked { .. } => RoomEventKind::Unchecked,
            Self::Swept { .. } => RoomEventKind::Swept,
        }
    }

    /// Guild whose log channel should receive the notification.
    pub fn guild_id(&self) -> GuildId {
        match self {
            Self::Provisioned { room, .. }
            | Self::Reclaimed { room, .. }
            | Self::Dangling { room, .. }
            | Self::Unchecked { room, .. } => room.guild_id,
            Self::Denied { guild_id, .. }
            | Self::Orphaned { guild_id, .. }
            | Self::Swept { guild_id, .. } => *guild_id,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Provisioned { .. } => "Voice room created",
            Self::Reclaimed { .. } => "Voice room deleted",
            Self::Denied { .. } => "Voice room denied",
            Self::Orphaned { .. } | Self::Dangling { .. } => "Voice room needs cleanup",
            Self::Unchecked { .. } => "Voice room not checked",
            Self::Swept { .. } => "Voice rooms swept",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Provisioned { room, owner_name } => format!(
                "<#{}> created for {} (<@{}>) as **{}**",
                room.room_id, owner_name, room.owner_id, room.owning_role_label
            ),
            Self::Reclaimed { room, lifetime } => format!(
                "**{}** room owned by <@{}> deleted after {}",
                room.owning_role_label,
                room.owner_id,
                format_lifetime(*lifetime)
            ),
            Self::Denied {
                user_id,
                display_name,
                ..
            } => format!(
                "{} (<@{}>) joined the lobby without an allowed role",
                display_name, user_id
            ),
            Self::Orphaned {
                room_id,
                user_id,
                operation,
                reason,
                ..
            } => format!(
                "Room <#{}> for <@{}> was created but the bot failed to {}: {}. It is not tracked and must be removed manually.",
                room_id, user_id, operation, reason
            ),
            Self::Dangling { room, reason } => format!(
                "Empty room <#{}> owned by <@{}> could not be deleted: {}. It is no longer tracked and must be removed manually.",
                room.room_id, room.owner_id, reason
            ),
            Self::Unchecked { room, reason } => format!(
                "Could not check whether room <#{}> owned by <@{}> is empty: {}. It is kept until the next departure or sweep.",
                room.room_id, room.owner_id, reason
            ),
            Self::Swept {
                reclaimed,
                unchecked,
                ..
            } => {
                let mut description = format!("Deleted {} empty room(s)", reclaimed);
                if *unchecked > 0 {
                    description.push_str(&format!(", could not check {} room(s)", unchecked));
                }
                description
            }
        }
    }

    /// Embed color: green for creation, grey for deletion, orange for denials and unread rooms,
    /// red for rooms needing cleanup.
    pub fn color(&self) -> u32 {
        match self {
            Self::Provisioned { .. } => 0x2ecc71,
            Self::Reclaimed { .. } | Self::Swept { .. } => 0x95a5a6,
            Self::Denied { .. } => 0xf39c12,
            Self::Orphaned { .. } | Self::Dangling { .. } => 0xe74c3c,
            Self::Unchecked { .. } => 0xf39c12,
        }
    }
}
