//! Administrative operations behind the `/voicerooms` command.
//!
//! Allow-list maintenance and registry reporting. The sweep itself lives on
//! `VoiceRoomService` since it needs the platform.

use serenity::all::RoleId;

use crate::{
    data::{AccessPolicy, RoomRegistry},
    model::room::RoomStats,
};

pub struct AdminService<'a> {
    registry: &'a RoomRegistry,
    policy: &'a AccessPolicy,
}

impl<'a> AdminService<'a> {
    pub fn new(registry: &'a RoomRegistry, policy: &'a AccessPolicy) -> Self {
        Self { registry, policy }
    }

    /// Allows members with `role_id` to create rooms.
    ///
    /// # Returns
    /// - `true` - Role added
    /// - `false` - Role was already allowed
    pub async fn allow_role(&self, role_id: RoleId) -> bool {
        let added = self.policy.add(role_id).await;
        if added {
            tracing::info!("Role {} added to the voice room allow-list", role_id);
        }
        added
    }

    /// Removes `role_id` from the allow-list. Removing the last role opens room creation to
    /// everyone.
    ///
    /// # Returns
    /// - `true` - Role removed
    /// - `false` - Role was not in the allow-list
    pub async fn disallow_role(&self, role_id: RoleId) -> bool {
        let removed = self.policy.remove(role_id).await;
        if removed {
            tracing::info!("Role {} removed from the voice room allow-list", role_id);
        }
        removed
    }

    /// Current allow-list; empty means unrestricted.
    pub async fn allowed_roles(&self) -> Vec<RoleId> {
        self.policy.allow_list().await.roles().to_vec()
    }

    pub async fn stats(&self) -> RoomStats {
        self.registry.stats().await
    }
}
