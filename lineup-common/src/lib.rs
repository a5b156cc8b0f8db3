//! # Lineup Common Library
//!
//! Shared code for the lineup bot crates including:
//! - Identifier newtypes (users, channels, messages, roles)
//! - Emoji value types (observed and configured)
//! - Event types (LineupEvent enum) and the EventBus
//! - Configuration loading

pub mod config;
pub mod emoji;
pub mod error;
pub mod events;
pub mod ids;

pub use emoji::{EmojiRef, ReactionEmoji};
pub use error::{Error, Result};
pub use ids::{
    ApplicationId, ChannelId, GuildId, InteractionId, MessageId, MessageRef, RoleId, UserId,
};
