//! Error types for the bot.
//!
//! `AppError` is the top-level error returned from startup and background tasks. Room lifecycle
//! operations return `RoomError`, and the platform seam returns `PlatformError`. Event handlers
//! never propagate errors to the gateway: they log them and move on to the next event.

pub mod config;
pub mod internal;
pub mod platform;
pub mod room;

use thiserror::Error;

use crate::error::config::ConfigError;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),
}

/// Boxes the error to keep `AppError` small, as `serenity::Error` is very large.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
