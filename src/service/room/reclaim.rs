//! Reclamation of empty managed rooms.

use chrono::Utc;
use serenity::all::{ChannelId, GuildId};
use std::collections::BTreeMap;

use crate::{
    error::{
        platform::PlatformError,
        room::{PlatformOperation, RoomError},
    },
    model::{
        event::RoomEvent,
        room::{ManagedRoom, ReclaimOutcome, SweepReport},
    },
};

use super::VoiceRoomService;

impl VoiceRoomService<'_> {
    /// Handles a member leaving `room_id`.
    ///
    /// Untracked rooms are ignored. For a tracked room, occupancy is read once (after the
    /// configured reclaim delay, immediately by default); an empty room is deleted on the
    /// platform and then unregistered. The registry entry is removed even when the delete
    /// fails, and the dangling room is announced so operators can remove it.
    ///
    /// # Returns
    /// - `Ok(ReclaimOutcome::Reclaimed)` - Room deleted (or already gone) and unregistered
    /// - `Ok(ReclaimOutcome::Occupied)` - Room still has members and was kept
    /// - `Ok(ReclaimOutcome::InProgress)` - Another handler is reclaiming this room
    /// - `Err(RoomError::NotManaged)` - The room is not tracked; nothing was done
    /// - `Err(RoomError::PlatformCallFailed)` - Occupancy could not be read (room kept), or
    ///   the delete failed (room unregistered anyway); both are announced
    pub async fn reclaim(&self, room_id: ChannelId) -> Result<ReclaimOutcome, RoomError> {
        if !self.registry.contains(room_id).await {
            return Err(RoomError::NotManaged(room_id));
        }

        let Some(_claim) = self.registry.claim(room_id) else {
            tracing::debug!("Room {} is already being reclaimed", room_id);
            return Ok(ReclaimOutcome::InProgress);
        };

        if !self.settings.reclaim_delay.is_zero() {
            tokio::time::sleep(self.settings.reclaim_delay).await;
        }

        // Re-read under the claim: the room may have been unregistered while waiting
        let Some(room) = self.registry.get(room_id).await else {
            return Err(RoomError::NotManaged(room_id));
        };

        let occupancy = match self.platform.room_occupancy(room.guild_id, room_id).await {
            Ok(occupancy) => occupancy,
            Err(e) if e.is_room_not_found() => 0,
            Err(source) => {
                tracing::warn!("Could not read occupancy of room {}: {}", room_id, source);
                self.notifier
                    .announce(&RoomEvent::Unchecked {
                        room,
                        reason: source.to_string(),
                    })
                    .await;
                return Err(RoomError::PlatformCallFailed {
                    operation: PlatformOperation::QueryOccupancy,
                    orphaned_room: None,
                    source,
                });
            }
        };

        if occupancy > 0 {
            tracing::debug!("Room {} still has {} member(s)", room_id, occupancy);
            return Ok(ReclaimOutcome::Occupied(occupancy));
        }

        let deleted = self.platform.delete_room(room_id).await;
        self.registry.remove(room_id).await;

        match deleted {
            Ok(()) => {}
            Err(e) if e.is_room_not_found() => {
                tracing::debug!("Room {} was already deleted", room_id);
            }
            Err(source) => {
                self.announce_dangling(room, &source).await;
                return Err(RoomError::PlatformCallFailed {
                    operation: PlatformOperation::DeleteRoom,
                    orphaned_room: Some(room_id),
                    source,
                });
            }
        }

        self.announce_reclaimed(&room).await;

        Ok(ReclaimOutcome::Reclaimed(room))
    }

    /// Unregisters a room that was deleted outside of the bot.
    ///
    /// No platform call is made. Returns the removed entry, or `None` for untracked rooms.
    pub async fn forget(&self, room_id: ChannelId) -> Option<ManagedRoom> {
        let room = self.registry.remove(room_id).await?;

        tracing::info!(
            "Managed room {} owned by {} was deleted externally, unregistered",
            room.room_id,
            room.owner_id
        );

        Some(room)
    }

    /// Deletes every managed room that is currently empty.
    ///
    /// Empty rooms are unregistered regardless of the delete outcome, so running the sweep
    /// twice without intervening events issues no delete calls the second time. Rooms whose
    /// delete failed are reported as dangling, not reclaimed. Rooms whose occupancy cannot be
    /// read are kept. Rooms with a reclaim already in flight are skipped.
    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let mut unchecked: BTreeMap<GuildId, usize> = BTreeMap::new();

        for room in self.registry.rooms().await {
            let Some(_claim) = self.registry.claim(room.room_id) else {
                continue;
            };

            // Unregistered by another handler since the snapshot
            if !self.registry.contains(room.room_id).await {
                continue;
            }

            let occupancy = match self.platform.room_occupancy(room.guild_id, room.room_id).await
            {
                Ok(occupancy) => occupancy,
                Err(e) if e.is_room_not_found() => 0,
                Err(e) => {
                    tracing::warn!(
                        "Sweep could not read occupancy of room {}: {}",
                        room.room_id,
                        e
                    );
                    report.failed += 1;
                    *unchecked.entry(room.guild_id).or_default() += 1;
                    continue;
                }
            };

            if occupancy > 0 {
                report.occupied += 1;
                continue;
            }

            report.delete_calls += 1;
            let deleted = self.platform.delete_room(room.room_id).await;
            self.registry.remove(room.room_id).await;

            match deleted {
                Err(source) if !source.is_room_not_found() => {
                    self.announce_dangling(room.clone(), &source).await;
                    report.dangling.push(room);
                }
                _ => report.reclaimed.push(room),
            }
        }

        if !report.reclaimed.is_empty() || !report.dangling.is_empty() || report.failed > 0 {
            tracing::info!(
                "Sweep reclaimed {} room(s), {} dangling, kept {} occupied, {} unreadable",
                report.reclaimed.len(),
                report.dangling.len(),
                report.occupied,
                report.failed
            );
        }

        let mut per_guild: BTreeMap<GuildId, (usize, usize)> = BTreeMap::new();
        for room in &report.reclaimed {
            per_guild.entry(room.guild_id).or_default().0 += 1;
        }
        for (guild_id, count) in unchecked {
            per_guild.entry(guild_id).or_default().1 += count;
        }
        for (guild_id, (reclaimed, unchecked)) in per_guild {
            self.notifier
                .announce(&RoomEvent::Swept {
                    guild_id,
                    reclaimed,
                    unchecked,
                })
                .await;
        }

        report
    }

    async fn announce_reclaimed(&self, room: &ManagedRoom) {
        let lifetime = room.lifetime(Utc::now());

        tracing::info!(
            "Deleted empty voice room {} owned by {} ({})",
            room.room_id,
            room.owner_id,
            room.owning_role_label
        );

        self.notifier
            .announce(&RoomEvent::Reclaimed {
                room: room.clone(),
                lifetime,
            })
            .await;
    }

    async fn announce_dangling(&self, room: ManagedRoom, source: &PlatformError) {
        tracing::error!(
            "Failed to delete empty room {}, unregistered anyway: {}",
            room.room_id,
            source
        );

        self.notifier
            .announce(&RoomEvent::Dangling {
                room,
                reason: source.to_string(),
            })
            .await;
    }
}
