//! Access policy evaluation and owning-role resolution.
//!
//! Both are pure: they operate on snapshots and the actor's resolved roles, never on the
//! platform, and never communicate. Notifying a denied actor is the caller's job.

use serenity::all::{Role, RoleId};
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::model::actor::{Actor, OwningRole};

/// Label used when the actor has no role of their own and no default role is configured.
pub const FALLBACK_ROLE_LABEL: &str = "Member";

/// Snapshot of the access policy's allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AllowList {
    roles: Vec<RoleId>,
}

impl AllowList {
    pub fn new(roles: Vec<RoleId>) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &[RoleId] {
        &self.roles
    }

    /// An empty allow-list permits everyone.
    pub fn is_unrestricted(&self) -> bool {
        self.roles.is_empty()
    }

    /// Whether an actor holding `actor_roles` may provision a room.
    ///
    /// True when the allow-list is empty or shares at least one role with `actor_roles`.
    pub fn permits(&self, actor_roles: &[RoleId]) -> bool {
        self.is_unrestricted() || actor_roles.iter().any(|role| self.roles.contains(role))
    }
}

/// Resolves the role that owns an actor's room.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResolver {
    /// Configured default role for actors holding no role of their own.
    default_role_id: Option<RoleId>,
}

impl RoleResolver {
    pub fn new(default_role_id: Option<RoleId>) -> Self {
        Self { default_role_id }
    }

    /// Returns the actor's highest non-@everyone role, else the default role, else the generic
    /// "Member" label.
    ///
    /// Precedence follows Discord's hierarchy: higher position first, and for equal positions
    /// the older (lower id) role first. A configured default role missing from `guild_roles`
    /// is ignored, leaving the generic label.
    pub fn resolve(&self, actor: &Actor, guild_roles: &HashMap<RoleId, Role>) -> OwningRole {
        let everyone = actor.everyone_role_id();

        actor
            .roles
            .iter()
            .filter(|role| role.id != everyone)
            .min_by_key(|role| (Reverse(role.position), role.id))
            .or_else(|| {
                self.default_role_id
                    .and_then(|role_id| guild_roles.get(&role_id))
            })
            .map(|role| OwningRole {
                role_id: Some(role.id),
                label: role.name.clone(),
            })
            .unwrap_or_else(|| OwningRole {
                role_id: None,
                label: FALLBACK_ROLE_LABEL.to_string(),
            })
    }
}
