//! Voice Rooms Test Utils
//!
//! Shared factories for building Discord objects in unit tests of the voice room bot. The bot
//! keeps no database, so the only fixtures needed are Serenity models that would otherwise
//! only come from the gateway.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::{create_test_member, create_test_role};
//!
//! let role = create_test_role(1, 200, "Raiders", 5);
//! let member = create_test_member(1, 42, "pilot", None, &[200]);
//! ```

pub mod serenity;
