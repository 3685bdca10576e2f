//! Dynamic voice-room bot.
//!
//! Provisions a private, role-scoped voice room whenever a member joins the configured lobby
//! room, and reclaims that room once it is empty again. See the `service` module for the room
//! lifecycle and `bot` for the Discord event wiring.

mod bot;
mod config;
mod data;
mod error;
mod model;
mod scheduler;
mod service;
mod startup;
mod state;
mod util;

use crate::{config::Config, error::AppError, state::BotState};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_logging();

    let config = Config::from_env()?;
    let state = BotState::new(&config);

    tracing::info!(
        "Starting voice room bot with lobby {} ({} allowed roles)",
        config.rooms.lobby_channel_id,
        config.allowed_role_ids.len()
    );

    let client = bot::start::init_bot(&config, state.clone()).await?;

    // Periodic sweep shares the bot's HTTP client and cache
    if let Some(schedule) = config.sweep_schedule.clone() {
        let http = client.http.clone();
        let cache = client.cache.clone();
        let sweep_state = state.clone();
        tokio::spawn(async move {
            if let Err(e) =
                scheduler::sweep::start_scheduler(schedule, sweep_state, http, cache).await
            {
                tracing::error!("Room sweep scheduler error: {}", e);
            }
        });
    } else {
        tracing::info!("Periodic room sweep disabled");
    }

    bot::start::start_bot(client).await
}
