//! Test factory for creating Serenity Role objects.

use serenity::all::Role;

/// Creates a test Serenity Role belonging to `guild_id`.
///
/// All other fields are defaults: not hoisted, not managed, not mentionable, no color and zero
/// permissions.
///
/// # Arguments
/// - `guild_id` - Guild the role belongs to
/// - `role_id` - Discord role ID (snowflake)
/// - `name` - Role name
/// - `position` - Role position in the hierarchy (higher = more important)
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role (indicates invalid test data)
pub fn create_test_role(guild_id: u64, role_id: u64, name: &str, position: u16) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "guild_id": guild_id.to_string(),
        "name": name,
        "color": 0,
        "colors": {
            "primary_color": 0,
            "secondary_color": null,
            "tertiary_color": null,
        },
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
    }))
    .expect("Failed to create test role - invalid JSON structure")
}

/// Creates the @everyone role for `guild_id`, which shares the guild's id and sits at
/// position 0.
pub fn create_everyone_role(guild_id: u64) -> Role {
    create_test_role(guild_id, guild_id, "@everyone", 0)
}
