//! Test factory for creating Serenity Member objects.

use serenity::all::Member;

/// Creates a test guild Member.
///
/// The user's global name is unset, so the member's display name is the nickname when given
/// and the username otherwise.
///
/// # Arguments
/// - `guild_id` - Guild the member belongs to
/// - `user_id` - Discord user ID (snowflake)
/// - `username` - Account username
/// - `nick` - Optional guild nickname
/// - `role_ids` - Role IDs assigned to the member, excluding @everyone
///
/// # Panics
/// - If the JSON cannot be deserialized into a Member (indicates invalid test data)
pub fn create_test_member(
    guild_id: u64,
    user_id: u64,
    username: &str,
    nick: Option<&str>,
    role_ids: &[u64],
) -> Member {
    let roles: Vec<String> = role_ids.iter().map(|id| id.to_string()).collect();

    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "user": {
            "id": user_id.to_string(),
            "username": username,
            "discriminator": "0001",
            "global_name": null,
            "avatar": null,
            "bot": false,
        },
        "nick": nick,
        "avatar": null,
        "roles": roles,
        "joined_at": "2020-01-01T00:00:00.000000+00:00",
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
    }))
    .expect("Failed to create test member - invalid JSON structure")
}
