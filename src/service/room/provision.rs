//! Room provisioning for members entering the lobby.

use chrono::Utc;
use serenity::all::{
    ChannelId, PermissionOverwrite, PermissionOverwriteType, Permissions, Role, RoleId,
};
use std::collections::HashMap;

use crate::{
    error::{
        platform::PlatformError,
        room::{PlatformOperation, RoomError},
    },
    model::{
        actor::{Actor, OwningRole},
        event::RoomEvent,
        room::{CreateVoiceRoomParam, ManagedRoom},
    },
    util::format::render_room_name,
};

use super::VoiceRoomService;

/// Private message sent to a member denied by the access policy.
pub const DENIED_MESSAGE: &str =
    "You don't have a role that is allowed to create a voice room, so no room was created for you.";

/// Permissions granted to @everyone on a new room.
pub fn default_permissions() -> Permissions {
    Permissions::VIEW_CHANNEL | Permissions::CONNECT
}

/// Permissions granted to the member who triggered creation.
pub fn owner_permissions() -> Permissions {
    Permissions::VIEW_CHANNEL
        | Permissions::CONNECT
        | Permissions::MANAGE_CHANNELS
        | Permissions::MOVE_MEMBERS
        | Permissions::MUTE_MEMBERS
        | Permissions::DEAFEN_MEMBERS
}

/// Permissions granted to the owning role.
pub fn owning_role_permissions() -> Permissions {
    Permissions::VIEW_CHANNEL | Permissions::CONNECT | Permissions::SPEAK
}

/// Access overlay for a new room: @everyone, then the owner, then the owning role.
///
/// The owning role grant is skipped for the generic fallback label, which has no role.
pub fn room_overlay(actor: &Actor, owning_role: &OwningRole) -> Vec<PermissionOverwrite> {
    let everyone = actor.everyone_role_id();

    let mut overwrites = vec![
        PermissionOverwrite {
            allow: default_permissions(),
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(everyone),
        },
        PermissionOverwrite {
            allow: owner_permissions(),
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(actor.user_id),
        },
    ];

    if let Some(role_id) = owning_role.role_id.filter(|role_id| *role_id != everyone) {
        overwrites.push(PermissionOverwrite {
            allow: owning_role_permissions(),
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Role(role_id),
        });
    }

    overwrites
}

impl VoiceRoomService<'_> {
    /// Provisions a room for an actor who entered the lobby.
    ///
    /// Steps run in order: policy check, role resolution, room creation, access overlay, move,
    /// registration. Failed platform calls are not retried.
    ///
    /// # Arguments
    /// - `actor` - Member who entered the lobby, with resolved roles
    /// - `guild_roles` - The guild's role table, used to resolve the configured default role
    /// - `lobby_id` - The lobby room, used to inherit the category when none is configured
    ///
    /// # Returns
    /// - `Ok(ManagedRoom)` - The registered room
    /// - `Err(RoomError::Forbidden)` - Policy denied the actor; no platform call was made
    /// - `Err(RoomError::PlatformCallFailed)` - A platform call failed. If it failed after
    ///   creation, `orphaned_room` is set and the room is not registered
    pub async fn provision(
        &self,
        actor: &Actor,
        guild_roles: &HashMap<RoleId, Role>,
        lobby_id: ChannelId,
    ) -> Result<ManagedRoom, RoomError> {
        let allow_list = self.policy.allow_list().await;
        if !allow_list.permits(&actor.role_ids()) {
            tracing::info!(
                "Denied voice room for {} ({}) in guild {}",
                actor.display_name,
                actor.user_id,
                actor.guild_id
            );

            self.notifier
                .announce(&RoomEvent::Denied {
                    guild_id: actor.guild_id,
                    user_id: actor.user_id,
                    display_name: actor.display_name.clone(),
                })
                .await;
            self.notifier
                .notify_member(actor.user_id, DENIED_MESSAGE)
                .await;

            return Err(RoomError::Forbidden {
                user_id: actor.user_id,
            });
        }

        let owning_role = self.resolver.resolve(actor, guild_roles);

        let category_id = match self.settings.category_id {
            Some(category_id) => Some(category_id),
            None => match self.platform.room_group(actor.guild_id, lobby_id).await {
                Ok(category_id) => category_id,
                Err(e) => {
                    tracing::warn!(
                        "Failed to read category of lobby {}, creating room without one: {}",
                        lobby_id,
                        e
                    );
                    None
                }
            },
        };

        let room_id = self
            .platform
            .create_voice_room(CreateVoiceRoomParam {
                guild_id: actor.guild_id,
                name: render_room_name(
                    &self.settings.name_template,
                    &owning_role.label,
                    &actor.display_name,
                ),
                category_id,
                user_limit: self.settings.user_limit,
            })
            .await
            .map_err(|source| RoomError::PlatformCallFailed {
                operation: PlatformOperation::CreateRoom,
                orphaned_room: None,
                source,
            })?;

        let overwrites = room_overlay(actor, &owning_role);
        if let Err(source) = self.platform.edit_room_access(room_id, &overwrites).await {
            return Err(self
                .orphaned(actor, room_id, PlatformOperation::EditAccess, source)
                .await);
        }

        if let Err(source) = self
            .platform
            .move_member(actor.guild_id, actor.user_id, room_id)
            .await
        {
            return Err(self
                .orphaned(actor, room_id, PlatformOperation::MoveMember, source)
                .await);
        }

        let room = ManagedRoom {
            room_id,
            guild_id: actor.guild_id,
            owner_id: actor.user_id,
            owning_role_label: owning_role.label,
            created_at: Utc::now(),
        };

        if !self.registry.insert(room.clone()).await {
            tracing::warn!("Room {} was already registered", room_id);
        }

        tracing::info!(
            "Created voice room {} for {} ({}) as {}",
            room_id,
            actor.display_name,
            actor.user_id,
            room.owning_role_label
        );

        self.notifier
            .announce(&RoomEvent::Provisioned {
                room: room.clone(),
                owner_name: actor.display_name.clone(),
            })
            .await;

        Ok(room)
    }

    /// Reports a room left behind by a failed step after creation.
    ///
    /// The room is not registered and is not deleted automatically; operators are told so
    /// they can clean it up.
    async fn orphaned(
        &self,
        actor: &Actor,
        room_id: ChannelId,
        operation: PlatformOperation,
        source: PlatformError,
    ) -> RoomError {
        tracing::error!(
            "Failed to {} for new room {} (owner {}), room is orphaned: {}",
            operation,
            room_id,
            actor.user_id,
            source
        );

        self.notifier
            .announce(&RoomEvent::Orphaned {
                guild_id: actor.guild_id,
                room_id,
                user_id: actor.user_id,
                operation,
                reason: source.to_string(),
            })
            .await;

        RoomError::PlatformCallFailed {
            operation,
            orphaned_room: Some(room_id),
            source,
        }
    }
}
