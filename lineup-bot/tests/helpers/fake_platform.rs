//! In-memory chat platform
//!
//! Messages live in a map keyed by location. Deleting one makes later fetches and edits
//! fail with NotFound, which is how the display recreate path is exercised.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use lineup_bot::platform::{ChatPlatform, FetchedMessage, MessageReaction, PlatformError, PlatformResult};
use lineup_common::events::{InteractionRef, SlashCommand};
use lineup_common::{
    ApplicationId, ChannelId, EmojiRef, GuildId, MessageId, MessageRef, ReactionEmoji, UserId,
};

/// Interaction responses in the order they were made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionCall {
    Defer,
    Finish(String),
    Respond(String),
}

#[derive(Debug, Clone)]
struct StoredMessage {
    content: String,
    reactions: Vec<MessageReaction>,
}

#[derive(Default)]
struct Inner {
    next_message_id: u64,
    messages: HashMap<MessageRef, StoredMessage>,
    sent: Vec<(ChannelId, String)>,
    edits: Vec<(MessageRef, String)>,
    reactions_added: Vec<MessageRef>,
    reactions_removed: Vec<MessageRef>,
    notices: Vec<(ChannelId, String)>,
    interactions: Vec<InteractionCall>,
    registrations: Vec<(ApplicationId, Vec<SlashCommand>)>,
    member_names: HashMap<UserId, String>,
    member_lookups: usize,
    fail_add_reaction: bool,
    fail_edit: bool,
    fail_remove_reaction: bool,
    unfetchable: HashSet<MessageRef>,
}

/// Recording [`ChatPlatform`] for router and display tests
pub struct FakePlatform {
    inner: Mutex<Inner>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_message_id: 1000,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// A message posted by someone else, visible to fetches
    pub fn seed_message(&self, location: MessageRef, content: &str) {
        self.lock().messages.insert(
            location,
            StoredMessage {
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
    }

    /// Delete a message out from under the bot
    pub fn delete_message(&self, location: MessageRef) {
        self.lock().messages.remove(&location);
    }

    pub fn set_member_name(&self, user: UserId, name: &str) {
        self.lock().member_names.insert(user, name.to_string());
    }

    pub fn fail_add_reaction(&self, fail: bool) {
        self.lock().fail_add_reaction = fail;
    }

    pub fn fail_edit(&self, fail: bool) {
        self.lock().fail_edit = fail;
    }

    pub fn fail_remove_reaction(&self, fail: bool) {
        self.lock().fail_remove_reaction = fail;
    }

    /// Fetches of this message fail even though it exists
    pub fn make_unfetchable(&self, location: MessageRef) {
        self.lock().unfetchable.insert(location);
    }

    pub fn content_of(&self, location: MessageRef) -> Option<String> {
        self.lock().messages.get(&location).map(|m| m.content.clone())
    }

    /// Whether the bot's own reaction is currently on the message
    pub fn has_own_reaction(&self, location: MessageRef) -> bool {
        self.lock()
            .messages
            .get(&location)
            .map(|m| m.reactions.iter().any(|r| r.me))
            .unwrap_or(false)
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.lock().sent.clone()
    }

    pub fn edits(&self) -> Vec<(MessageRef, String)> {
        self.lock().edits.clone()
    }

    pub fn reactions_added(&self) -> Vec<MessageRef> {
        self.lock().reactions_added.clone()
    }

    pub fn reactions_removed(&self) -> Vec<MessageRef> {
        self.lock().reactions_removed.clone()
    }

    pub fn notices(&self) -> Vec<(ChannelId, String)> {
        self.lock().notices.clone()
    }

    pub fn interactions(&self) -> Vec<InteractionCall> {
        self.lock().interactions.clone()
    }

    pub fn registrations(&self) -> Vec<(ApplicationId, Vec<SlashCommand>)> {
        self.lock().registrations.clone()
    }

    pub fn member_lookups(&self) -> usize {
        self.lock().member_lookups
    }

    /// Count of platform writes (sends, edits, reactions, notices)
    pub fn write_count(&self) -> usize {
        let inner = self.lock();
        inner.sent.len()
            + inner.edits.len()
            + inner.reactions_added.len()
            + inner.reactions_removed.len()
            + inner.notices.len()
    }
}

#[async_trait]
impl ChatPlatform for FakePlatform {
    async fn send_message(&self, channel: ChannelId, content: &str) -> PlatformResult<MessageRef> {
        let mut inner = self.lock();
        inner.next_message_id += 1;
        let location = MessageRef::new(channel, MessageId(inner.next_message_id));
        inner.messages.insert(
            location,
            StoredMessage {
                content: content.to_string(),
                reactions: Vec::new(),
            },
        );
        inner.sent.push((channel, content.to_string()));
        Ok(location)
    }

    async fn edit_message(&self, message: MessageRef, content: &str) -> PlatformResult<()> {
        let mut inner = self.lock();
        if inner.fail_edit {
            return Err(PlatformError::Api {
                status: 403,
                body: "Missing Permissions".to_string(),
            });
        }
        let stored = inner
            .messages
            .get_mut(&message)
            .ok_or_else(|| PlatformError::NotFound(message.to_string()))?;
        stored.content = content.to_string();
        inner.edits.push((message, content.to_string()));
        Ok(())
    }

    async fn fetch_message(&self, message: MessageRef) -> PlatformResult<FetchedMessage> {
        let inner = self.lock();
        if inner.unfetchable.contains(&message) {
            return Err(PlatformError::Network("connection reset".to_string()));
        }
        let stored = inner
            .messages
            .get(&message)
            .ok_or_else(|| PlatformError::NotFound(message.to_string()))?;
        Ok(FetchedMessage {
            location: message,
            reactions: stored.reactions.clone(),
        })
    }

    async fn add_reaction(&self, message: MessageRef, emoji: &ReactionEmoji) -> PlatformResult<()> {
        let mut inner = self.lock();
        if inner.fail_add_reaction {
            return Err(PlatformError::Api {
                status: 403,
                body: "Missing Access".to_string(),
            });
        }
        let emoji = match emoji {
            ReactionEmoji::Custom(id) => EmojiRef::custom(*id, "lineup"),
            ReactionEmoji::Unicode(name) => EmojiRef::unicode(name.clone()),
        };
        if let Some(stored) = inner.messages.get_mut(&message) {
            stored.reactions.push(MessageReaction {
                emoji,
                me: true,
            });
        }
        inner.reactions_added.push(message);
        Ok(())
    }

    async fn remove_own_reaction(&self, message: MessageRef, emoji: &EmojiRef) -> PlatformResult<()> {
        let mut inner = self.lock();
        if inner.fail_remove_reaction {
            return Err(PlatformError::Network("timeout".to_string()));
        }
        if let Some(stored) = inner.messages.get_mut(&message) {
            stored.reactions.retain(|r| !(r.me && r.emoji == *emoji));
        }
        inner.reactions_removed.push(message);
        Ok(())
    }

    async fn member_display_name(
        &self,
        _guild: GuildId,
        user: UserId,
    ) -> PlatformResult<Option<String>> {
        let mut inner = self.lock();
        inner.member_lookups += 1;
        Ok(inner.member_names.get(&user).cloned())
    }

    async fn send_notice(&self, channel: ChannelId, content: &str) -> PlatformResult<()> {
        self.lock().notices.push((channel, content.to_string()));
        Ok(())
    }

    async fn defer_interaction(&self, _interaction: &InteractionRef) -> PlatformResult<()> {
        self.lock().interactions.push(InteractionCall::Defer);
        Ok(())
    }

    async fn finish_interaction(
        &self,
        _interaction: &InteractionRef,
        content: &str,
    ) -> PlatformResult<()> {
        self.lock()
            .interactions
            .push(InteractionCall::Finish(content.to_string()));
        Ok(())
    }

    async fn respond_interaction(
        &self,
        _interaction: &InteractionRef,
        content: &str,
    ) -> PlatformResult<()> {
        self.lock()
            .interactions
            .push(InteractionCall::Respond(content.to_string()));
        Ok(())
    }

    async fn register_commands(
        &self,
        application: ApplicationId,
        commands: &[SlashCommand],
    ) -> PlatformResult<()> {
        self.lock()
            .registrations
            .push((application, commands.to_vec()));
        Ok(())
    }
}
