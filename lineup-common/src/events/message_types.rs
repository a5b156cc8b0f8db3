//! Inbound message event types

use crate::ids::{ChannelId, GuildId, MessageId, MessageRef, RoleId, UserId};

/// A newly created chat message, reduced to what lineup handling needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    /// None for direct messages
    pub guild_id: Option<GuildId>,
    pub author_id: UserId,
    /// Member nickname, else global display name, else username
    pub author_display_name: String,
    /// Roles mentioned in the message content
    pub mentioned_roles: Vec<RoleId>,
}

impl InboundMessage {
    pub fn message_ref(&self) -> MessageRef {
        MessageRef::new(self.channel_id, self.message_id)
    }
}
