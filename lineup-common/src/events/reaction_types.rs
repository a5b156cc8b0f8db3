//! Reaction event types
//!
//! The platform reports reactions in two shapes: a rich one with a resolved member
//! (display name available without further lookups) and a raw one carrying only ids.
//! Both share the projection in [`ReactionEvent`]; only [`ReactionForm::Rich`] adds a name.

use crate::emoji::EmojiRef;
use crate::ids::{ChannelId, GuildId, MessageId, MessageRef, UserId};

/// Which shape the reaction notification arrived in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionForm {
    /// Member object was present; display name already resolved
    Rich { display_name: String },
    /// Only ids available
    Raw,
}

/// Reaction added to or removed from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    /// User who reacted (or whose reaction was removed)
    pub user_id: UserId,
    /// None for direct messages
    pub guild_id: Option<GuildId>,
    pub emoji: EmojiRef,
    pub form: ReactionForm,
}

impl ReactionEvent {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.channel_id, self.message_id)
    }

    /// Display name, if the notification already carried one
    pub fn display_name(&self) -> Option<&str> {
        match &self.form {
            ReactionForm::Rich { display_name } => Some(display_name),
            ReactionForm::Raw => None,
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self.form, ReactionForm::Rich { .. })
    }
}
