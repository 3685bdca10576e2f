//! Domain models for the room lifecycle.
//!
//! Models use serenity's id types directly; there is no persistence layer to convert to or
//! from.

pub mod actor;
pub mod event;
pub mod room;
