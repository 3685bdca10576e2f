use serenity::all::Cache;
use serenity::http::Http;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::room::VoiceRoomService, state::BotState};

/// Starts the periodic room sweep
///
/// Each run deletes managed rooms that are empty but were never reclaimed, such as rooms whose
/// owner disconnected before the departure could be matched to a registered room, or whose
/// occupancy could not be read when the last member left.
///
/// # Arguments
/// - `schedule`: Cron expression with seconds, e.g. `0 */15 * * * *`
/// - `state`: Shared bot state
/// - `discord_http`: Discord HTTP client for deletions and notifications
/// - `cache`: Gateway cache for room occupancy
pub async fn start_scheduler(
    schedule: String,
    state: BotState,
    discord_http: Arc<Http>,
    cache: Arc<Cache>,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
        let state = state.clone();
        let http = discord_http.clone();
        let cache = cache.clone();

        Box::pin(async move {
            run_sweep(&state, http, cache).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Room sweep scheduler started ({})", schedule);

    Ok(())
}

async fn run_sweep(state: &BotState, discord_http: Arc<Http>, cache: Arc<Cache>) {
    if state.registry.len().await == 0 {
        return;
    }

    let (platform, notifier) = state.detached_collaborators(discord_http, cache);
    let report = VoiceRoomService::new(
        &platform,
        &notifier,
        &state.registry,
        &state.policy,
        &state.rooms,
    )
    .sweep()
    .await;

    tracing::debug!(
        "Scheduled sweep: {} reclaimed, {} dangling, {} occupied, {} unreadable",
        report.reclaimed.len(),
        report.dangling.len(),
        report.occupied,
        report.failed
    );
}
