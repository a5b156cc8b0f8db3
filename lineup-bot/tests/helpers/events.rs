//! Synthetic inbound events

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use lineup_bot::EventRouter;
use lineup_common::config::LineupConfig;
use lineup_common::events::{
    CommandInvocation, InboundMessage, InteractionRef, LineupEvent, ReactionEvent, ReactionForm,
    SlashCommand,
};
use lineup_common::{
    ApplicationId, ChannelId, EmojiRef, GuildId, InteractionId, MessageId, MessageRef, RoleId,
    UserId,
};

use super::FakePlatform;

pub const BOT: UserId = UserId(1);
pub const APP: ApplicationId = ApplicationId(2);
pub const GUILD: GuildId = GuildId(10);
pub const CHANNEL: ChannelId = ChannelId(100);
pub const TARGET_ROLE: RoleId = RoleId(500);
pub const OTHER_ROLE: RoleId = RoleId(501);

pub fn anchor(message_id: u64) -> MessageRef {
    MessageRef::new(CHANNEL, MessageId(message_id))
}

/// Config with one target role, ✅ and the given capacity
pub fn config(max_participants: usize) -> LineupConfig {
    LineupConfig {
        target_role_ids: HashSet::from([TARGET_ROLE]),
        max_participants,
        ..LineupConfig::default()
    }
}

/// Router over a fresh fake platform, already past `Connected`
pub async fn connected_router(
    max_participants: usize,
) -> (Arc<FakePlatform>, EventRouter<FakePlatform>) {
    let platform = Arc::new(FakePlatform::new());
    let router = EventRouter::new(Arc::clone(&platform), Arc::new(config(max_participants)));
    router.handle(connected()).await;
    (platform, router)
}

pub fn connected() -> LineupEvent {
    LineupEvent::Connected {
        bot_user_id: BOT,
        application_id: APP,
        session_started: Utc::now(),
    }
}

pub fn message(message_id: u64, author: u64, name: &str, roles: &[RoleId]) -> LineupEvent {
    LineupEvent::MessageReceived(InboundMessage {
        channel_id: CHANNEL,
        message_id: MessageId(message_id),
        guild_id: Some(GUILD),
        author_id: UserId(author),
        author_display_name: name.to_string(),
        mentioned_roles: roles.to_vec(),
    })
}

/// Role call from `author` mentioning the target role
pub fn role_call(message_id: u64, author: u64, name: &str) -> LineupEvent {
    message(message_id, author, name, &[TARGET_ROLE])
}

fn reaction(message_id: u64, user: u64, emoji: &str, form: ReactionForm) -> ReactionEvent {
    ReactionEvent {
        channel_id: CHANNEL,
        message_id: MessageId(message_id),
        user_id: UserId(user),
        guild_id: Some(GUILD),
        emoji: EmojiRef::unicode(emoji),
        form,
    }
}

/// Reaction add carrying the member's display name
pub fn rich_add(message_id: u64, user: u64, name: &str) -> LineupEvent {
    LineupEvent::ReactionAdded(reaction(
        message_id,
        user,
        "✅",
        ReactionForm::Rich {
            display_name: name.to_string(),
        },
    ))
}

/// Reaction add with ids only
pub fn raw_add(message_id: u64, user: u64) -> LineupEvent {
    LineupEvent::ReactionAdded(reaction(message_id, user, "✅", ReactionForm::Raw))
}

pub fn add_with_emoji(message_id: u64, user: u64, emoji: &str) -> LineupEvent {
    LineupEvent::ReactionAdded(reaction(
        message_id,
        user,
        emoji,
        ReactionForm::Rich {
            display_name: format!("User{}", user),
        },
    ))
}

pub fn remove(message_id: u64, user: u64) -> LineupEvent {
    LineupEvent::ReactionRemoved(reaction(message_id, user, "✅", ReactionForm::Raw))
}

pub fn command(command: SlashCommand, invoked_by: u64) -> LineupEvent {
    LineupEvent::CommandInvoked(CommandInvocation {
        command,
        interaction: InteractionRef {
            id: InteractionId(9000),
            application_id: APP,
            token: "interaction-token".to_string(),
        },
        channel_id: CHANNEL,
        invoked_by: UserId(invoked_by),
    })
}
