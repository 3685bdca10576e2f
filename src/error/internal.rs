use std::num::ParseIntError;
use thiserror::Error;

/// Internal issues with identifier handling
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to parse id from String
    #[error("Failed to parse ID from String '{value}': {source}")]
    ParseStringId {
        /// The string value that failed to parse
        value: String,
        /// The underlying parse error
        #[source]
        source: ParseIntError,
    },

    /// Discord snowflakes are never zero; serenity id constructors panic on it.
    #[error("ID '{value}' must be non-zero")]
    ZeroId {
        /// The string value that parsed to zero
        value: String,
    },
}
