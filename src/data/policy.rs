//! In-memory access policy store.

use serenity::all::RoleId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::service::access::AllowList;

/// Shared, mutable allow-list of roles that may provision rooms.
///
/// Mutated by admin commands and read on every provisioning attempt. Reads take a snapshot,
/// so an add/remove racing with an in-flight evaluation may or may not be observed by it.
#[derive(Clone, Default)]
pub struct AccessPolicy {
    /// Allowed roles in insertion order, without duplicates.
    roles: Arc<RwLock<Vec<RoleId>>>,
}

impl AccessPolicy {
    /// Creates a policy seeded with the given roles, dropping duplicates.
    pub fn new(initial: impl IntoIterator<Item = RoleId>) -> Self {
        let mut roles: Vec<RoleId> = Vec::new();
        for role_id in initial {
            if !roles.contains(&role_id) {
                roles.push(role_id);
            }
        }

        Self {
            roles: Arc::new(RwLock::new(roles)),
        }
    }

    /// Adds a role to the allow-list.
    ///
    /// # Returns
    /// - `true` - The role was added
    /// - `false` - The role was already allowed
    pub async fn add(&self, role_id: RoleId) -> bool {
        let mut roles = self.roles.write().await;

        if roles.contains(&role_id) {
            return false;
        }

        roles.push(role_id);
        true
    }

    /// Removes a role from the allow-list.
    ///
    /// # Returns
    /// - `true` - The role was removed
    /// - `false` - The role was not in the allow-list
    pub async fn remove(&self, role_id: RoleId) -> bool {
        let mut roles = self.roles.write().await;
        let before = roles.len();
        roles.retain(|id| *id != role_id);
        roles.len() != before
    }

    /// Snapshot of the current allow-list.
    pub async fn allow_list(&self) -> AllowList {
        AllowList::new(self.roles.read().await.clone())
    }
}
