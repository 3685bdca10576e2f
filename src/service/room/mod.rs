//! Voice room lifecycle service.
//!
//! `VoiceRoomService` provisions rooms for members entering the lobby and reclaims them once
//! they are empty. It borrows all of its collaborators, so an event handler builds one per
//! event from the shared bot state and the event's context.
//!
//! The service is organized into separate modules by concern:
//! - `provision` - Lobby entry: policy check, room creation, overlay, move, registration
//! - `reclaim` - Departure handling, external deletions and the administrative sweep
//! - `transition` - Ordering of a departure and a lobby entry from one voice state update
//!
//! # Concurrency
//!
//! Handlers for different events run interleaved while awaiting platform calls. A room is
//! registered only after every provisioning step succeeded, and unregistered only after its
//! occupancy was observed as zero, so the worst interleaving deletes a room moments after a
//! member re-entered it. Reclaim sequences for the same room are serialized by a per-room claim
//! on the registry.

pub mod provision;
pub mod reclaim;
pub mod transition;

use crate::{
    config::RoomSettings,
    data::{AccessPolicy, RoomRegistry},
    service::{access::RoleResolver, notifier::Notifier, platform::VoicePlatform},
};

pub struct VoiceRoomService<'a> {
    platform: &'a dyn VoicePlatform,
    notifier: &'a dyn Notifier,
    registry: &'a RoomRegistry,
    policy: &'a AccessPolicy,
    settings: &'a RoomSettings,
    resolver: RoleResolver,
}

impl<'a> VoiceRoomService<'a> {
    /// Creates a new VoiceRoomService instance.
    ///
    /// The owning-role resolver uses the default role from `settings`.
    ///
    /// # Arguments
    /// - `platform` - Outbound platform operations
    /// - `notifier` - Operator and member notifications
    /// - `registry` - Shared registry of managed rooms
    /// - `policy` - Shared access allow-list
    /// - `settings` - Room lifecycle settings
    pub fn new(
        platform: &'a dyn VoicePlatform,
        notifier: &'a dyn Notifier,
        registry: &'a RoomRegistry,
        policy: &'a AccessPolicy,
        settings: &'a RoomSettings,
    ) -> Self {
        Self {
            platform,
            notifier,
            registry,
            policy,
            settings,
            resolver: RoleResolver::new(settings.default_role_id),
        }
    }
}
