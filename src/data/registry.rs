//! In-memory registry of managed voice rooms.
//!
//! The registry is the single source of truth for "is this a room we manage". A room id is
//! present iff the room was created by the provisioner and has not been deleted yet. Each
//! method takes the lock for the duration of one map operation only, so a read followed by a
//! write is never atomic; callers that need a room-scoped critical section take a
//! `ReclaimClaim` first.

use serenity::all::ChannelId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

use crate::model::room::{ManagedRoom, RoomStats};

/// Shared, cloneable registry of managed rooms.
///
/// Clones share the same underlying map, so one registry is created at startup and handed to
/// every event handler and the sweep scheduler. Tests create independent instances.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    /// Managed rooms keyed by room id.
    rooms: Arc<RwLock<HashMap<ChannelId, ManagedRoom>>>,
    /// Rooms with a reclaim sequence in flight.
    ///
    /// Guarded by a std mutex since it is never held across an await and must be released
    /// from `Drop`.
    reclaiming: Arc<Mutex<HashSet<ChannelId>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a newly provisioned room.
    ///
    /// Entries are never updated in place; if the id is already registered the existing entry
    /// is kept.
    ///
    /// # Returns
    /// - `true` - The room was inserted
    /// - `false` - The room id was already registered
    pub async fn insert(&self, room: ManagedRoom) -> bool {
        let mut rooms = self.rooms.write().await;

        if rooms.contains_key(&room.room_id) {
            return false;
        }

        rooms.insert(room.room_id, room);
        true
    }

    pub async fn get(&self, room_id: ChannelId) -> Option<ManagedRoom> {
        self.rooms.read().await.get(&room_id).cloned()
    }

    pub async fn contains(&self, room_id: ChannelId) -> bool {
        self.rooms.read().await.contains_key(&room_id)
    }

    /// Unregisters a room. Removing an unknown id is a no-op.
    pub async fn remove(&self, room_id: ChannelId) -> Option<ManagedRoom> {
        self.rooms.write().await.remove(&room_id)
    }

    /// Snapshot of all managed rooms, oldest first.
    pub async fn rooms(&self) -> Vec<ManagedRoom> {
        let mut rooms: Vec<ManagedRoom> = self.rooms.read().await.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.room_id.cmp(&b.room_id))
        });
        rooms
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Room count overall and per owning role label.
    pub async fn stats(&self) -> RoomStats {
        let rooms = self.rooms.read().await;

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for room in rooms.values() {
            *counts.entry(room.owning_role_label.as_str()).or_default() += 1;
        }

        let mut per_role: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        per_role.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        RoomStats {
            total: rooms.len(),
            per_role,
        }
    }

    /// Claims a room for reclamation.
    ///
    /// At most one claim per room exists at a time; the claim is released when the returned
    /// guard is dropped. Claims for different rooms never contend.
    ///
    /// # Returns
    /// - `Some(ReclaimClaim)` - The caller owns the room's reclaim sequence
    /// - `None` - Another handler is already reclaiming this room
    pub fn claim(&self, room_id: ChannelId) -> Option<ReclaimClaim> {
        let mut reclaiming = self
            .reclaiming
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !reclaiming.insert(room_id) {
            return None;
        }

        Some(ReclaimClaim {
            room_id,
            reclaiming: Arc::clone(&self.reclaiming),
        })
    }
}

/// Exclusive right to reclaim one room, released on drop.
pub struct ReclaimClaim {
    room_id: ChannelId,
    reclaiming: Arc<Mutex<HashSet<ChannelId>>>,
}

impl Drop for ReclaimClaim {
    fn drop(&mut self) {
        self.reclaiming
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.room_id);
    }
}
