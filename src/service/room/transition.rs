//! Voice transitions: a departure and a possible lobby entry from one voice state update.

use serenity::all::{ChannelId, Role, RoleId};
use std::collections::HashMap;
use std::future::Future;

use crate::{
    error::room::RoomError,
    model::{
        actor::Actor,
        event::VoiceTransition,
        room::{ManagedRoom, ReclaimOutcome},
    },
};

use super::VoiceRoomService;

/// Member entering the lobby, with the guild's role table.
pub type LobbyEntrant = (Actor, HashMap<RoleId, Role>);

/// What a transition did on each side.
#[derive(Debug, Default)]
pub struct TransitionOutcome {
    /// Reclaim of the departed room, when that room is managed.
    pub departure: Option<Result<ReclaimOutcome, RoomError>>,
    /// Provisioning for a lobby entry, when the entrant could be resolved.
    pub entry: Option<Result<ManagedRoom, RoomError>>,
}

impl VoiceRoomService<'_> {
    /// Handles one voice transition.
    ///
    /// Mute, deafen and stream updates do nothing. A departure from a managed room is handled
    /// before the lobby entry. With a reclaim delay configured, the entry proceeds while the
    /// departure waits out the delay.
    ///
    /// # Arguments
    /// - `transition` - The member's room change
    /// - `lobby_entrant` - Resolves the member and guild roles; only called for a lobby entry.
    ///   Returning `None` skips provisioning.
    pub async fn handle_transition<F, Fut>(
        &self,
        transition: &VoiceTransition,
        lobby_entrant: F,
    ) -> TransitionOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<LobbyEntrant>>,
    {
        if !transition.is_room_change() {
            return TransitionOutcome::default();
        }

        let lobby_id = self.settings.lobby_channel_id;
        let departed = self.managed_departure(transition).await;

        let departure = async move {
            match departed {
                Some(room_id) => Some(self.reclaim(room_id).await),
                None => None,
            }
        };
        let entry = async move {
            if !transition.entered(lobby_id) {
                return None;
            }
            let (actor, guild_roles) = lobby_entrant().await?;
            Some(self.provision(&actor, &guild_roles, lobby_id).await)
        };

        let (departure, entry) = if self.settings.reclaim_delay.is_zero() {
            let departure = departure.await;
            (departure, entry.await)
        } else {
            tokio::join!(departure, entry)
        };

        TransitionOutcome { departure, entry }
    }

    async fn managed_departure(&self, transition: &VoiceTransition) -> Option<ChannelId> {
        let room_id = transition.departed()?;
        self.registry.contains(room_id).await.then_some(room_id)
    }
}
