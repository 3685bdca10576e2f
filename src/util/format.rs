use chrono::Duration;

/// Formats a room lifetime as a compact human-readable string, e.g. `1h 2m 3s`.
///
/// Hours are omitted when zero, minutes are omitted when both hours and minutes are zero.
/// Negative durations (clock skew) are shown as `0s`.
pub fn format_lifetime(lifetime: Duration) -> String {
    let total = lifetime.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Renders a room name from a template with `{role}` and `{user}` placeholders.
///
/// Discord caps channel names at 100 characters; longer names are truncated on a character
/// boundary.
pub fn render_room_name(template: &str, role_label: &str, display_name: &str) -> String {
    const MAX_CHANNEL_NAME_CHARS: usize = 100;

    let name = template
        .replace("{role}", role_label)
        .replace("{user}", display_name);

    if name.chars().count() > MAX_CHANNEL_NAME_CHARS {
        name.chars().take(MAX_CHANNEL_NAME_CHARS).collect()
    } else {
        name
    }
}
