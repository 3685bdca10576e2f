//! Discord bot integration for the voice room lifecycle.
//!
//! The bot listens for voice state updates to provision and reclaim rooms, tracks deletions of
//! managed rooms, and serves the `/voicerooms` admin command. Its HTTP client and cache are
//! shared with the sweep scheduler.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Guild, channel and role data for the cache
//! - `GUILD_VOICE_STATES` - Voice state updates and cached room occupancy
//! - `GUILD_MEMBERS` - Member data for resolving an actor's roles (privileged intent)
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod command;
pub mod handler;
pub mod start;
