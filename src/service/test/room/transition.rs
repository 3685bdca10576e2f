use super::*;
use crate::service::room::transition::LobbyEntrant;
use std::cell::Cell;

/// Builds a room change for user 42 in the test guild.
fn moved(before: Option<ChannelId>, after: Option<ChannelId>) -> VoiceTransition {
    VoiceTransition {
        guild_id: GuildId::new(GUILD_ID),
        user_id: UserId::new(42),
        before,
        after,
    }
}

/// Position of the first recorded call matching `predicate`.
fn position(calls: &[PlatformCall], predicate: impl Fn(&PlatformCall) -> bool) -> usize {
    calls.iter().position(predicate).unwrap()
}

/// Tests a move from the member's managed room straight into the lobby.
///
/// Verifies the departure is handled before the lobby entry: the old room is deleted before
/// the new one is created.
///
/// Expected: old room reclaimed, new room provisioned, delete recorded before the create
#[tokio::test]
async fn departure_is_handled_before_lobby_entry() {
    let harness = Harness::new();
    let old_room = provision_for(&harness, 42).await;
    harness.platform.leave(old_room, UserId::new(42));
    harness.platform.join(harness.lobby(), UserId::new(42));
    let calls_before = harness.platform.calls().len();

    let outcome = harness
        .service()
        .handle_transition(&moved(Some(old_room), Some(harness.lobby())), || async {
            Some((
                actor(42, "pilot", &[(11, "Raiders", 3)]),
                harness.guild_roles.clone(),
            ))
        })
        .await;

    assert!(matches!(
        outcome.departure,
        Some(Ok(ReclaimOutcome::Reclaimed(ref room))) if room.room_id == old_room
    ));
    let new_room = outcome.entry.unwrap().unwrap().room_id;
    assert_ne!(new_room, old_room);

    let calls = harness.platform.calls().split_off(calls_before);
    let deleted = position(&calls, |call| *call == PlatformCall::DeleteRoom(old_room));
    let created = position(&calls, |call| {
        matches!(call, PlatformCall::CreateVoiceRoom(_))
    });
    assert!(deleted < created);
    assert!(!harness.registry.contains(old_room).await);
    assert!(harness.registry.contains(new_room).await);
}

/// Tests the same move with a reclaim delay.
///
/// Verifies the lobby entry is not held up by the delay, and the old room is still reclaimed
/// once the delay has passed.
///
/// Expected: create recorded before the delete, both rooms handled
#[tokio::test]
async fn delayed_departure_does_not_hold_up_entry() {
    let mut harness = Harness::new();
    harness.settings.reclaim_delay = Duration::from_millis(50);
    let old_room = provision_for(&harness, 42).await;
    harness.platform.leave(old_room, UserId::new(42));
    let calls_before = harness.platform.calls().len();

    let outcome = harness
        .service()
        .handle_transition(&moved(Some(old_room), Some(harness.lobby())), || async {
            Some((actor(42, "pilot", &[]), harness.guild_roles.clone()))
        })
        .await;

    assert!(matches!(
        outcome.departure,
        Some(Ok(ReclaimOutcome::Reclaimed(_)))
    ));
    assert!(matches!(outcome.entry, Some(Ok(_))));

    let calls = harness.platform.calls().split_off(calls_before);
    let deleted = position(&calls, |call| *call == PlatformCall::DeleteRoom(old_room));
    let created = position(&calls, |call| {
        matches!(call, PlatformCall::CreateVoiceRoom(_))
    });
    assert!(created < deleted);
}

/// Tests a departure from an unmanaged room into another unmanaged room.
///
/// Expected: nothing reclaimed, entrant never resolved, no platform call
#[tokio::test]
async fn unmanaged_move_does_nothing() {
    let harness = Harness::new();
    let resolved = Cell::new(false);

    let outcome = harness
        .service()
        .handle_transition(
            &moved(Some(ChannelId::new(1)), Some(ChannelId::new(2))),
            || async {
                resolved.set(true);
                None::<LobbyEntrant>
            },
        )
        .await;

    assert!(!resolved.get());
    assert!(outcome.departure.is_none());
    assert!(outcome.entry.is_none());
    assert!(harness.platform.calls().is_empty());
}

/// Tests a mute toggle inside a managed room.
///
/// Expected: no departure, no entry, no platform call
#[tokio::test]
async fn mute_toggle_is_ignored() {
    let harness = Harness::new();
    let room_id = provision_for(&harness, 42).await;
    let calls_before = harness.platform.calls().len();

    let outcome = harness
        .service()
        .handle_transition(&moved(Some(room_id), Some(room_id)), || async {
            None::<LobbyEntrant>
        })
        .await;

    assert!(outcome.departure.is_none());
    assert!(outcome.entry.is_none());
    assert_eq!(harness.platform.calls().len(), calls_before);
    assert!(harness.registry.contains(room_id).await);
}

/// Tests a lobby entry whose member cannot be resolved, such as a bot.
///
/// Expected: no room provisioned
#[tokio::test]
async fn unresolved_entrant_is_skipped() {
    let harness = Harness::new();

    let outcome = harness
        .service()
        .handle_transition(&moved(None, Some(harness.lobby())), || async {
            None::<LobbyEntrant>
        })
        .await;

    assert!(outcome.entry.is_none());
    assert!(harness.platform.calls().is_empty());
}

/// Tests a managed room deleted outside of the bot.
///
/// Verifies the entry is dropped without touching the platform.
///
/// Expected: the removed entry returned, registry empty, zero platform calls
#[tokio::test]
async fn forget_unregisters_without_platform_calls() {
    let harness = Harness::new();
    let room_id = provision_for(&harness, 42).await;
    harness.platform.delete_room_externally(room_id);
    let calls_before = harness.platform.calls().len();

    let forgotten = harness.service().forget(room_id).await;

    assert_eq!(forgotten.map(|room| room.room_id), Some(room_id));
    assert!(!harness.registry.contains(room_id).await);
    assert_eq!(harness.platform.calls().len(), calls_before);
}

/// Tests deleting a channel the bot does not manage.
///
/// Expected: None and no platform call
#[tokio::test]
async fn forget_ignores_unmanaged_channel() {
    let harness = Harness::new();

    let forgotten = harness.service().forget(ChannelId::new(1)).await;

    assert!(forgotten.is_none());
    assert!(harness.platform.calls().is_empty());
}
