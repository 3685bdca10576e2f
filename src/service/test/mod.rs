//! In-memory collaborators for testing the room lifecycle without Discord.

use serenity::all::{
    ChannelId, GuildId, PermissionOverwrite, PermissionOverwriteType, Permissions, Role, RoleId,
    UserId,
};
use serenity::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::{
    config::RoomSettings,
    data::{AccessPolicy, RoomRegistry},
    error::{platform::PlatformError, room::PlatformOperation},
    model::{actor::Actor, event::RoomEvent, room::CreateVoiceRoomParam},
    service::{notifier::Notifier, platform::VoicePlatform, room::VoiceRoomService},
};
use test_utils::serenity::{create_everyone_role, create_test_role};


pub const GUILD_ID: u64 = 1000;
pub const LOBBY_ID: u64 = 2000;
/// First id handed out by `FakePlatform` for created rooms.
pub const FIRST_ROOM_ID: u64 = 9000;

/// Outbound call recorded by `FakePlatform`.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    RoomGroup(ChannelId),
    CreateVoiceRoom(CreateVoiceRoomParam),
    /// Room and the `(target, allow)` pairs applied to it.
    EditRoomAccess(ChannelId, Vec<(PermissionOverwriteType, Permissions)>),
    MoveMember(UserId, ChannelId),
    RoomOccupancy(ChannelId),
    DeleteRoom(ChannelId),
}

#[derive(Default)]
struct FakePlatformState {
    next_id: u64,
    /// Existing rooms and the members connected to each.
    rooms: HashMap<ChannelId, HashSet<UserId>>,
    calls: Vec<PlatformCall>,
    failing: HashSet<PlatformOperation>,
    lobby_category: Option<ChannelId>,
}

/// `VoicePlatform` keeping rooms and occupancy in memory.
pub struct FakePlatform {
    state: Mutex<FakePlatformState>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakePlatformState {
                next_id: FIRST_ROOM_ID,
                ..Default::default()
            }),
        }
    }

    /// Makes every call of `operation` fail with `PlatformError::Rejected`.
    pub fn fail(&self, operation: PlatformOperation) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    pub fn set_lobby_category(&self, category_id: ChannelId) {
        self.state.lock().unwrap().lobby_category = Some(category_id);
    }

    /// Creates a room directly, without recording a call.
    pub fn add_room(&self, room_id: ChannelId) {
        self.state
            .lock()
            .unwrap()
            .rooms
            .entry(room_id)
            .or_default();
    }

    pub fn join(&self, room_id: ChannelId, user_id: UserId) {
        self.state
            .lock()
            .unwrap()
            .rooms
            .entry(room_id)
            .or_default()
            .insert(user_id);
    }

    pub fn leave(&self, room_id: ChannelId, user_id: UserId) {
        if let Some(members) = self.state.lock().unwrap().rooms.get_mut(&room_id) {
            members.remove(&user_id);
        }
    }

    /// Deletes a room as if someone removed it by hand.
    pub fn delete_room_externally(&self, room_id: ChannelId) {
        self.state.lock().unwrap().rooms.remove(&room_id);
    }

    pub fn has_room(&self, room_id: ChannelId) -> bool {
        self.state.lock().unwrap().rooms.contains_key(&room_id)
    }

    pub fn members(&self, room_id: ChannelId) -> usize {
        self.state
            .lock()
            .unwrap()
            .rooms
            .get(&room_id)
            .map_or(0, HashSet::len)
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn delete_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PlatformCall::DeleteRoom(_)))
            .count()
    }

    fn record(
        &self,
        call: PlatformCall,
        operation: Option<PlatformOperation>,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);

        match operation {
            Some(operation) if state.failing.contains(&operation) => {
                Err(PlatformError::Rejected(format!("{} rejected", operation)))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl VoicePlatform for FakePlatform {
    async fn room_group(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Option<ChannelId>, PlatformError> {
        self.record(PlatformCall::RoomGroup(channel_id), None)?;
        Ok(self.state.lock().unwrap().lobby_category)
    }

    async fn create_voice_room(
        &self,
        param: CreateVoiceRoomParam,
    ) -> Result<ChannelId, PlatformError> {
        self.record(
            PlatformCall::CreateVoiceRoom(param),
            Some(PlatformOperation::CreateRoom),
        )?;

        let mut state = self.state.lock().unwrap();
        let room_id = ChannelId::new(state.next_id);
        state.next_id += 1;
        state.rooms.insert(room_id, HashSet::new());
        Ok(room_id)
    }

    async fn edit_room_access(
        &self,
        room_id: ChannelId,
        overwrites: &[PermissionOverwrite],
    ) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::EditRoomAccess(
                room_id,
                overwrites
                    .iter()
                    .map(|overwrite| (overwrite.kind, overwrite.allow))
                    .collect(),
            ),
            Some(PlatformOperation::EditAccess),
        )
    }

    async fn move_member(
        &self,
        _guild_id: GuildId,
        user_id: UserId,
        room_id: ChannelId,
    ) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::MoveMember(user_id, room_id),
            Some(PlatformOperation::MoveMember),
        )?;

        let mut state = self.state.lock().unwrap();
        for members in state.rooms.values_mut() {
            members.remove(&user_id);
        }
        state.rooms.entry(room_id).or_default().insert(user_id);
        Ok(())
    }

    async fn room_occupancy(
        &self,
        _guild_id: GuildId,
        room_id: ChannelId,
    ) -> Result<usize, PlatformError> {
        self.record(
            PlatformCall::RoomOccupancy(room_id),
            Some(PlatformOperation::QueryOccupancy),
        )?;
        Ok(self.members(room_id))
    }

    async fn delete_room(&self, room_id: ChannelId) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::DeleteRoom(room_id),
            Some(PlatformOperation::DeleteRoom),
        )?;

        match self.state.lock().unwrap().rooms.remove(&room_id) {
            Some(_) => Ok(()),
            None => Err(PlatformError::RoomNotFound(room_id)),
        }
    }
}

/// `Notifier` recording announcements and direct messages.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<RoomEvent>>,
    messages: Mutex<Vec<(UserId, String)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<RoomEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<(UserId, String)> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn announce(&self, event: &RoomEvent) -> bool {
        self.events.lock().unwrap().push(event.clone());
        true
    }

    async fn notify_member(&self, user_id: UserId, content: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .push((user_id, content.to_string()));
        true
    }
}

/// Collaborators for one test, owned so the service can borrow them.
pub struct Harness {
    pub platform: FakePlatform,
    pub notifier: RecordingNotifier,
    pub registry: RoomRegistry,
    pub policy: AccessPolicy,
    pub settings: RoomSettings,
    /// Guild role table handed to provisioning.
    pub guild_roles: HashMap<RoleId, Role>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_allowed_roles(Vec::new())
    }

    pub fn with_allowed_roles(roles: Vec<RoleId>) -> Self {
        Self {
            platform: FakePlatform::new(),
            notifier: RecordingNotifier::default(),
            registry: RoomRegistry::new(),
            policy: AccessPolicy::new(roles),
            settings: test_settings(),
            guild_roles: HashMap::new(),
        }
    }

    pub fn service(&self) -> VoiceRoomService<'_> {
        VoiceRoomService::new(
            &self.platform,
            &self.notifier,
            &self.registry,
            &self.policy,
            &self.settings,
        )
    }

    pub fn lobby(&self) -> ChannelId {
        ChannelId::new(LOBBY_ID)
    }
}

pub fn test_settings() -> RoomSettings {
    RoomSettings {
        lobby_channel_id: ChannelId::new(LOBBY_ID),
        category_id: None,
        user_limit: None,
        default_role_id: None,
        name_template: "{role}'s VC".to_string(),
        reclaim_delay: Duration::ZERO,
    }
}

/// Builds an actor in the test guild holding the given `(role_id, name, position)` roles plus
/// @everyone.
pub fn actor(user_id: u64, display_name: &str, roles: &[(u64, &str, u16)]) -> Actor {
    let mut resolved: Vec<_> = roles
        .iter()
        .map(|(role_id, name, position)| create_test_role(GUILD_ID, *role_id, name, *position))
        .collect();
    resolved.push(create_everyone_role(GUILD_ID));

    Actor {
        guild_id: GuildId::new(GUILD_ID),
        user_id: UserId::new(user_id),
        display_name: display_name.to_string(),
        roles: resolved,
    }
}
