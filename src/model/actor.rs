//! Actor domain model.
//!
//! An actor is the guild member whose voice state changed. It carries the member's resolved
//! roles so the access policy and role resolver can run without touching the platform.

use serenity::all::{GuildId, Member, Role, RoleId, UserId};
use std::collections::HashMap;

/// Member who triggered a voice event, with their roles resolved from the guild.
#[derive(Debug, Clone)]
pub struct Actor {
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// Nickname if set, otherwise global name or username.
    pub display_name: String,
    /// Roles held by the member, including the guild's @everyone role when known.
    pub roles: Vec<Role>,
}

impl Actor {
    /// Builds an actor from a guild member and the guild's role table.
    ///
    /// Role ids that are not present in `guild_roles` (stale cache) are dropped. The
    /// @everyone role is added when the guild table contains it, since Discord does not list it
    /// on the member.
    pub fn from_member(member: &Member, guild_roles: &HashMap<RoleId, Role>) -> Self {
        let everyone = RoleId::new(member.guild_id.get());

        let mut roles: Vec<Role> = member
            .roles
            .iter()
            .filter(|role_id| **role_id != everyone)
            .filter_map(|role_id| guild_roles.get(role_id).cloned())
            .collect();

        if let Some(everyone_role) = guild_roles.get(&everyone) {
            roles.push(everyone_role.clone());
        }

        Self {
            guild_id: member.guild_id,
            user_id: member.user.id,
            display_name: member.display_name().to_string(),
            roles,
        }
    }

    /// The guild's @everyone role id, which shares the guild's id.
    pub fn everyone_role_id(&self) -> RoleId {
        RoleId::new(self.guild_id.get())
    }

    pub fn role_ids(&self) -> Vec<RoleId> {
        self.roles.iter().map(|role| role.id).collect()
    }
}

/// Role that owns a provisioned room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwningRole {
    /// Role granted speak access in the room, `None` for the generic fallback.
    pub role_id: Option<RoleId>,
    /// Human-readable label used in the room name.
    pub label: String,
}
