//! Test factories for creating Serenity API objects.
//!
//! Objects are built by deserializing JSON shaped like Discord's API payloads, so they pass
//! through the same code paths as gateway data.
//!
//! # Available Factories
//!
//! - `role::create_test_role` - Guild roles at a given hierarchy position
//! - `role::create_everyone_role` - The guild's @everyone role
//! - `member::create_test_member` - Guild members with a role list

pub mod member;
pub mod role;

pub use member::create_test_member;
pub use role::{create_everyone_role, create_test_role};
