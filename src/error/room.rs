use serenity::all::{ChannelId, UserId};
use std::fmt;
use thiserror::Error;

use crate::error::platform::PlatformError;

/// Outbound platform operations, used to attribute a `PlatformCallFailed` to the step that
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformOperation {
    CreateRoom,
    EditAccess,
    MoveMember,
    QueryOccupancy,
    DeleteRoom,
}

impl fmt::Display for PlatformOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CreateRoom => "create room",
            Self::EditAccess => "edit room access",
            Self::MoveMember => "move member",
            Self::QueryOccupancy => "query occupancy",
            Self::DeleteRoom => "delete room",
        };
        f.write_str(name)
    }
}

/// Errors produced by the room lifecycle.
#[derive(Error, Debug)]
pub enum RoomError {
    /// The access policy denied the actor. No platform call was made.
    #[error("User {user_id} is not permitted to create a voice room")]
    Forbidden {
        /// The denied actor
        user_id: UserId,
    },

    /// A platform call failed.
    ///
    /// When the room had already been created, `orphaned_room` carries its id: the room exists
    /// on the platform but is not tracked in the registry and must be cleaned up by an operator.
    #[error("Failed to {operation}: {source}")]
    PlatformCallFailed {
        /// Which step failed
        operation: PlatformOperation,
        /// Room left behind by the failure, if any
        orphaned_room: Option<ChannelId>,
        /// The underlying platform error
        #[source]
        source: PlatformError,
    },

    /// An event referenced a room the registry does not track.
    ///
    /// Callers ignore this silently; it is not a failure.
    #[error("Room {0} is not managed")]
    NotManaged(ChannelId),
}
