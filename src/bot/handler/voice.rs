//! Voice state handler driving the room lifecycle.
//!
//! Every room change is handed to `VoiceRoomService::handle_transition`, which handles the
//! departure before the lobby entry. This module only resolves the entering member against the
//! cache (or HTTP) and logs what happened.

use serenity::all::{Context, GuildId, Member, Role, RoleId, UserId, VoiceState};
use std::collections::HashMap;

use crate::{
    error::room::RoomError,
    model::{actor::Actor, event::VoiceTransition},
    service::room::{transition::LobbyEntrant, VoiceRoomService},
    state::BotState,
};

/// Handles the voice_state_update event.
///
/// # Arguments
/// - `state` - Shared bot state
/// - `ctx` - Discord context for platform calls and the cache
/// - `old` - Previous voice state, if cached
/// - `new` - Updated voice state
pub async fn handle_voice_state_update(
    state: &BotState,
    ctx: Context,
    old: Option<VoiceState>,
    new: VoiceState,
) {
    let Some(transition) = VoiceTransition::from_states(old.as_ref(), &new) else {
        return;
    };

    if !transition.is_room_change() {
        return;
    }

    let (platform, notifier) = state.collaborators(&ctx);
    let service = VoiceRoomService::new(
        &platform,
        &notifier,
        &state.registry,
        &state.policy,
        &state.rooms,
    );

    let ctx = &ctx;
    let member = new.member;
    let outcome = service
        .handle_transition(&transition, move || async move {
            lobby_entrant(ctx, transition, member).await
        })
        .await;

    match outcome.departure {
        Some(Ok(reclaimed)) => tracing::debug!(
            "Departure of {} from {:?}: {:?}",
            transition.user_id,
            transition.before,
            reclaimed
        ),
        // Unregistered between the check and the reclaim
        Some(Err(RoomError::NotManaged(_))) | None => {}
        Some(Err(e)) => tracing::error!("Failed to reclaim room {:?}: {}", transition.before, e),
    }

    match outcome.entry {
        Some(Ok(_)) | Some(Err(RoomError::Forbidden { .. })) | None => {}
        Some(Err(e)) => tracing::error!(
            "Failed to provision voice room for {} in guild {}: {}",
            transition.user_id,
            transition.guild_id,
            e
        ),
    }
}

/// Resolves the member who entered the lobby. Bots and unresolvable members yield `None`.
async fn lobby_entrant(
    ctx: &Context,
    transition: VoiceTransition,
    member: Option<Member>,
) -> Option<LobbyEntrant> {
    let guild_roles = guild_roles(ctx, transition.guild_id).await?;

    let member = match member {
        Some(member) => member,
        None => fetch_member(ctx, transition.guild_id, transition.user_id).await?,
    };

    if member.user.bot {
        tracing::debug!("Ignoring bot {} in the lobby", member.user.id);
        return None;
    }

    Some((Actor::from_member(&member, &guild_roles), guild_roles))
}

/// Role table of the guild, from the cache when available.
async fn guild_roles(ctx: &Context, guild_id: GuildId) -> Option<HashMap<RoleId, Role>> {
    let cached = ctx.cache.guild(guild_id).map(|guild| guild.roles.clone());
    if cached.is_some() {
        return cached;
    }

    match guild_id.roles(&ctx.http).await {
        Ok(roles) => Some(roles),
        Err(e) => {
            tracing::error!("Failed to fetch roles of guild {}: {:?}", guild_id, e);
            None
        }
    }
}

async fn fetch_member(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<Member> {
    match guild_id.member(ctx, user_id).await {
        Ok(member) => Some(member),
        Err(e) => {
            tracing::error!(
                "Failed to fetch member {} of guild {}: {:?}",
                user_id,
                guild_id,
                e
            );
            None
        }
    }
}
