//! # Lineup Bot Library (lineup-bot)
//!
//! Reaction-driven lineup for Discord.
//!
//! **Purpose:** Moderators "call" a lineup by mentioning a target role; the bot reacts to
//! that message (the anchor), and anyone joins or leaves by toggling the same reaction.
//! One message in the channel always shows the current lineup.
//!
//! **Architecture:** gateway → EventBus → event loop → EventRouter → ChatPlatform (REST).
//! All lineup state is in memory and reset whenever the session is (re)established.

pub mod anchors;
pub mod display;
pub mod emoji;
pub mod gateway;
pub mod platform;
pub mod roster;
pub mod router;
pub mod runner;
pub mod state;
pub mod wire;

pub use platform::{ChatPlatform, DiscordClient, PlatformError};
pub use router::EventRouter;
pub use state::{LineupSnapshot, LineupState};
