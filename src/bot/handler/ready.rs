//! Ready event handler for bot initialization.
//!
//! Sets the bot's presence and registers the `/voicerooms` admin command. Registration is
//! global and idempotent, so it runs on every connection.

use serenity::all::{ActivityData, Command, Context, Ready};

use crate::bot::command;

/// Custom status shown on the bot's profile.
const ACTIVITY: &str = "Join the lobby for your own room";

/// Handles the ready event when the bot connects to Discord.
///
/// # Arguments
/// - `ctx` - Discord context for setting activity status and registering commands
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(ctx: Context, ready: Ready) {
    tracing::info!(
        "{} is connected to Discord ({} guilds)",
        ready.user.name,
        ready.guilds.len()
    );

    ctx.set_activity(Some(ActivityData::custom(ACTIVITY)));

    match Command::create_global_command(&ctx, command::register()).await {
        Ok(registered) => tracing::debug!("Registered /{} command", registered.name),
        Err(e) => tracing::error!("Failed to register /{} command: {:?}", command::NAME, e),
    }
}
