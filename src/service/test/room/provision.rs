use super::*;

/// Tests a denied actor.
///
/// Verifies that with allow-list `{A}` an actor holding only role `B` gets nothing: no
/// platform call, no registry entry, a Denied announcement and a private message.
///
/// Expected: Err(RoomError::Forbidden)
#[tokio::test]
async fn denies_actor_without_allowed_role() {
    let harness = Harness::with_allowed_roles(vec![RoleId::new(10)]);
    let actor = actor(42, "miner", &[(12, "Miners", 2)]);

    let result = harness.service().provision(&actor, &harness.guild_roles, harness.lobby()).await;

    assert!(matches!(
        result,
        Err(RoomError::Forbidden { user_id }) if user_id == UserId::new(42)
    ));
    assert!(harness.platform.calls().is_empty());
    assert_eq!(harness.registry.len().await, 0);

    let events = harness.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), RoomEventKind::Denied);
    assert_eq!(
        harness.notifier.messages(),
        vec![(UserId::new(42), DENIED_MESSAGE.to_string())]
    );
}

/// Tests the full provisioning sequence for a permitted actor.
///
/// Verifies the room is named after the highest role, the overlay grants @everyone, owner and
/// owning role in order, the actor is moved, and the room is registered.
///
/// Expected: Ok(ManagedRoom) owned by the actor with label "RoleZ"
#[tokio::test]
async fn provisions_room_for_permitted_actor() {
    let harness = Harness::with_allowed_roles(vec![RoleId::new(11)]);
    let actor = actor(42, "pilot", &[(11, "RoleZ", 5), (12, "Miners", 2)]);

    let room = harness
        .service()
        .provision(&actor, &harness.guild_roles, harness.lobby())
        .await
        .unwrap();

    let room_id = ChannelId::new(FIRST_ROOM_ID);
    assert_eq!(room.room_id, room_id);
    assert_eq!(room.owner_id, UserId::new(42));
    assert_eq!(room.guild_id, GuildId::new(GUILD_ID));
    assert_eq!(room.owning_role_label, "RoleZ");
    assert_eq!(harness.registry.get(room_id).await, Some(room));

    let calls = harness.platform.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], PlatformCall::RoomGroup(harness.lobby()));
    match &calls[1] {
        PlatformCall::CreateVoiceRoom(param) => {
            assert_eq!(param.name, "RoleZ's VC");
            assert_eq!(param.guild_id, GuildId::new(GUILD_ID));
            assert_eq!(param.category_id, None);
            assert_eq!(param.user_limit, None);
        }
        other => panic!("Expected room creation, got {:?}", other),
    }
    assert_eq!(
        calls[2],
        PlatformCall::EditRoomAccess(
            room_id,
            vec![
                (
                    PermissionOverwriteType::Role(RoleId::new(GUILD_ID)),
                    default_permissions()
                ),
                (
                    PermissionOverwriteType::Member(UserId::new(42)),
                    owner_permissions()
                ),
                (
                    PermissionOverwriteType::Role(RoleId::new(11)),
                    owning_role_permissions()
                ),
            ]
        )
    );
    assert_eq!(calls[3], PlatformCall::MoveMember(UserId::new(42), room_id));
    assert_eq!(harness.platform.members(room_id), 1);

    let events = harness.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), RoomEventKind::Provisioned);
}

/// Tests an actor whose only role is @everyone.
///
/// Verifies the room uses the generic label and the overlay has no owning-role grant.
///
/// Expected: "Member's VC" with two overwrites
#[tokio::test]
async fn everyone_only_actor_gets_generic_room() {
    let harness = Harness::new();
    let actor = actor(42, "pilot", &[]);

    let room = harness
        .service()
        .provision(&actor, &harness.guild_roles, harness.lobby())
        .await
        .unwrap();

    assert_eq!(room.owning_role_label, "Member");
    let overwrites = harness
        .platform
        .calls()
        .into_iter()
        .find_map(|call| match call {
            PlatformCall::EditRoomAccess(_, overwrites) => Some(overwrites),
            _ => None,
        })
        .unwrap();
    assert_eq!(overwrites.len(), 2);
}

/// Tests the configured default role for an actor without roles of their own.
///
/// Verifies the service picks up the default role from its settings and grants it on the room.
///
/// Expected: "Guests's VC" with an owning-role overwrite for role 30
#[tokio::test]
async fn everyone_only_actor_gets_configured_default_role() {
    let mut harness = Harness::new();
    harness.settings.default_role_id = Some(RoleId::new(30));
    let default_role = create_test_role(GUILD_ID, 30, "Guests", 1);
    harness.guild_roles.insert(default_role.id, default_role);

    let room = harness
        .service()
        .provision(&actor(42, "pilot", &[]), &harness.guild_roles, harness.lobby())
        .await
        .unwrap();

    assert_eq!(room.owning_role_label, "Guests");
    let overwrites = harness
        .platform
        .calls()
        .into_iter()
        .find_map(|call| match call {
            PlatformCall::EditRoomAccess(_, overwrites) => Some(overwrites),
            _ => None,
        })
        .unwrap();
    assert_eq!(overwrites.len(), 3);
    assert_eq!(
        overwrites[2],
        (
            PermissionOverwriteType::Role(RoleId::new(30)),
            owning_role_permissions()
        )
    );
}

/// Tests configured category and limit.
///
/// Verifies the configured category wins without reading the lobby's category, and the
/// configured user limit is passed through.
///
/// Expected: room created under category 77 with limit 5
#[tokio::test]
async fn uses_configured_category_and_limit() {
    let mut harness = Harness::new();
    harness.settings.category_id = Some(ChannelId::new(77));
    harness.settings.user_limit = Some(5);
    harness.platform.set_lobby_category(ChannelId::new(88));

    provision_for(&harness, 42).await;

    let calls = harness.platform.calls();
    assert!(!calls
        .iter()
        .any(|call| matches!(call, PlatformCall::RoomGroup(_))));
    match &calls[0] {
        PlatformCall::CreateVoiceRoom(param) => {
            assert_eq!(param.category_id, Some(ChannelId::new(77)));
            assert_eq!(param.user_limit, Some(5));
        }
        other => panic!("Expected room creation, got {:?}", other),
    }
}

/// Tests category inheritance from the lobby.
///
/// Expected: room created under the lobby's category
#[tokio::test]
async fn inherits_lobby_category() {
    let harness = Harness::new();
    harness.platform.set_lobby_category(ChannelId::new(88));

    provision_for(&harness, 42).await;

    let created = harness
        .platform
        .calls()
        .into_iter()
        .find_map(|call| match call {
            PlatformCall::CreateVoiceRoom(param) => Some(param),
            _ => None,
        })
        .unwrap();
    assert_eq!(created.category_id, Some(ChannelId::new(88)));
}

/// Tests a failed room creation.
///
/// Expected: Err(PlatformCallFailed) with no orphan, nothing registered or announced
#[tokio::test]
async fn create_failure_registers_nothing() {
    let harness = Harness::new();
    harness.platform.fail(PlatformOperation::CreateRoom);

    let result = harness
        .service()
        .provision(&actor(42, "pilot", &[]), &harness.guild_roles, harness.lobby())
        .await;

    assert!(matches!(
        result,
        Err(RoomError::PlatformCallFailed {
            operation: PlatformOperation::CreateRoom,
            orphaned_room: None,
            ..
        })
    ));
    assert_eq!(harness.registry.len().await, 0);
    assert!(harness.notifier.events().is_empty());
}

/// Tests a failed overlay after creation.
///
/// Verifies the created room is reported as orphaned, left on the platform, not registered,
/// and the member is not moved.
///
/// Expected: Err(PlatformCallFailed) with orphaned_room set
#[tokio::test]
async fn overlay_failure_orphans_room() {
    let harness = Harness::new();
    harness.platform.fail(PlatformOperation::EditAccess);

    let result = harness
        .service()
        .provision(&actor(42, "pilot", &[]), &harness.guild_roles, harness.lobby())
        .await;

    let room_id = ChannelId::new(FIRST_ROOM_ID);
    assert!(matches!(
        result,
        Err(RoomError::PlatformCallFailed {
            operation: PlatformOperation::EditAccess,
            orphaned_room: Some(orphan),
            ..
        }) if orphan == room_id
    ));
    assert!(harness.platform.has_room(room_id));
    assert!(!harness.registry.contains(room_id).await);
    assert!(!harness
        .platform
        .calls()
        .iter()
        .any(|call| matches!(call, PlatformCall::MoveMember(..))));

    let events = harness.notifier.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        RoomEvent::Orphaned { room_id: orphan, operation: PlatformOperation::EditAccess, .. }
            if *orphan == room_id
    ));
}

/// Tests a failed move after creation.
///
/// Expected: Err(PlatformCallFailed) with orphaned_room set and nothing registered
#[tokio::test]
async fn move_failure_orphans_room() {
    let harness = Harness::new();
    harness.platform.fail(PlatformOperation::MoveMember);

    let result = harness
        .service()
        .provision(&actor(42, "pilot", &[]), &harness.guild_roles, harness.lobby())
        .await;

    assert!(matches!(
        result,
        Err(RoomError::PlatformCallFailed {
            operation: PlatformOperation::MoveMember,
            orphaned_room: Some(_),
            ..
        })
    ));
    assert_eq!(harness.registry.len().await, 0);
}

/// Tests that provisioning never reuses a room.
///
/// Expected: two distinct rooms for two entries by the same member
#[tokio::test]
async fn each_entry_creates_a_new_room() {
    let harness = Harness::new();

    let first = provision_for(&harness, 42).await;
    let second = provision_for(&harness, 42).await;

    assert_ne!(first, second);
    assert_eq!(harness.registry.len().await, 2);
}
