//! Chat platform collaborator
//!
//! Everything the lineup core needs from the chat platform, expressed as one async trait.
//! The core only ever holds ids; messages are re-resolved through this trait on demand.
//!
//! [`DiscordClient`] implements it over the Discord REST API. Tests substitute an
//! in-memory implementation.

use async_trait::async_trait;
use lineup_common::events::{InteractionRef, SlashCommand};
use lineup_common::{ApplicationId, ChannelId, EmojiRef, GuildId, MessageRef, ReactionEmoji, UserId};
use thiserror::Error;

pub mod discord;

pub use discord::DiscordClient;

/// Platform call errors
///
/// The router never propagates these; each call site either falls back (display sync)
/// or logs and discards them (reaction retraction, notices).
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Message, channel or member does not exist (or is no longer visible)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Platform answered with a non-success status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Request never got an answer
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlatformError::NotFound(_))
    }
}

/// Convenience Result type for platform calls
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// One reaction group on a fetched message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReaction {
    pub emoji: EmojiRef,
    /// Whether the bot itself is among the reactors
    pub me: bool,
}

/// A message as returned by a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedMessage {
    pub location: MessageRef,
    pub reactions: Vec<MessageReaction>,
}

/// Chat platform operations used by the lineup core
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Post a new message; returns where it landed
    async fn send_message(&self, channel: ChannelId, content: &str) -> PlatformResult<MessageRef>;

    /// Replace a message's text content
    async fn edit_message(&self, message: MessageRef, content: &str) -> PlatformResult<()>;

    /// Fetch a message; fails with [`PlatformError::NotFound`] once it is gone
    async fn fetch_message(&self, message: MessageRef) -> PlatformResult<FetchedMessage>;

    /// Add the bot's reaction to a message
    async fn add_reaction(&self, message: MessageRef, emoji: &ReactionEmoji) -> PlatformResult<()>;

    /// Remove the bot's own reaction from a message
    async fn remove_own_reaction(&self, message: MessageRef, emoji: &EmojiRef) -> PlatformResult<()>;

    /// Guild member's display name, `None` if the user is not a member
    async fn member_display_name(
        &self,
        guild: GuildId,
        user: UserId,
    ) -> PlatformResult<Option<String>>;

    /// Post a short notice (e.g. "lineup full") to a channel
    async fn send_notice(&self, channel: ChannelId, content: &str) -> PlatformResult<()> {
        self.send_message(channel, content).await.map(|_| ())
    }

    /// Acknowledge an interaction with a deferred, ephemeral "thinking" response
    async fn defer_interaction(&self, interaction: &InteractionRef) -> PlatformResult<()>;

    /// Replace the deferred response with its final content
    async fn finish_interaction(
        &self,
        interaction: &InteractionRef,
        content: &str,
    ) -> PlatformResult<()>;

    /// Answer an interaction immediately
    async fn respond_interaction(
        &self,
        interaction: &InteractionRef,
        content: &str,
    ) -> PlatformResult<()>;

    /// Register (overwrite) the application's global slash commands
    async fn register_commands(
        &self,
        application: ApplicationId,
        commands: &[SlashCommand],
    ) -> PlatformResult<()>;
}
