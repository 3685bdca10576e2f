//! Business logic for the voice room lifecycle.
//!
//! - `access` - Allow-list evaluation and owning-role resolution
//! - `platform` - Outbound platform seam and its serenity implementation
//! - `notifier` - Best-effort notifications and their serenity implementation
//! - `room` - Provisioning, reclamation and sweeping
//! - `admin` - Allow-list maintenance and reporting for admin commands

pub mod access;
pub mod admin;
pub mod notifier;
pub mod platform;
pub mod room;

#[cfg(test)]
mod test;
