//! Gateway payloads and dispatch translation
//!
//! [`translate_dispatch`] turns a gateway dispatch (event name + data) into a
//! [`LineupEvent`]. It is pure so that every mapping can be tested from JSON fixtures.

use chrono::{DateTime, Utc};
use lineup_common::events::{
    CommandInvocation, InboundMessage, InteractionRef, LineupEvent, ReactionEvent, ReactionForm,
    SlashCommand,
};
use lineup_common::{ApplicationId, ChannelId, GuildId, InteractionId, MessageId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::GatewayError;
use crate::wire::{Emoji, Member, User};

/// Gateway opcodes used by the bot
pub mod opcode {
    pub const DISPATCH: u8 = 0;
    pub const HEARTBEAT: u8 = 1;
    pub const IDENTIFY: u8 = 2;
    pub const RECONNECT: u8 = 7;
    pub const INVALID_SESSION: u8 = 9;
    pub const HELLO: u8 = 10;
    pub const HEARTBEAT_ACK: u8 = 11;
}

/// Gateway intents requested at IDENTIFY
pub mod intents {
    pub const GUILDS: u64 = 1 << 0;
    pub const GUILD_MEMBERS: u64 = 1 << 1;
    pub const GUILD_MESSAGES: u64 = 1 << 9;
    pub const GUILD_MESSAGE_REACTIONS: u64 = 1 << 10;
    pub const DIRECT_MESSAGES: u64 = 1 << 12;
    pub const DIRECT_MESSAGE_REACTIONS: u64 = 1 << 13;
    pub const MESSAGE_CONTENT: u64 = 1 << 15;

    /// Everything the lineup needs
    pub const LINEUP: u64 = GUILDS
        | GUILD_MEMBERS
        | GUILD_MESSAGES
        | GUILD_MESSAGE_REACTIONS
        | DIRECT_MESSAGES
        | DIRECT_MESSAGE_REACTIONS
        | MESSAGE_CONTENT;
}

/// Interaction type for slash commands
const INTERACTION_APPLICATION_COMMAND: u8 = 2;

/// Envelope of every gateway message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayload {
    pub op: u8,
    #[serde(default)]
    pub d: Value,
    #[serde(default)]
    pub s: Option<u64>,
    #[serde(default)]
    pub t: Option<String>,
}

impl GatewayPayload {
    pub fn new(op: u8, d: Value) -> Self {
        Self {
            op,
            d,
            s: None,
            t: None,
        }
    }
}

/// HELLO data
#[derive(Debug, Deserialize)]
pub struct Hello {
    /// Milliseconds between heartbeats
    pub heartbeat_interval: u64,
}

#[derive(Debug, Deserialize)]
struct PartialApplication {
    id: ApplicationId,
}

#[derive(Debug, Deserialize)]
struct Ready {
    user: User,
    application: PartialApplication,
}

#[derive(Debug, Deserialize)]
struct MessageCreate {
    id: MessageId,
    channel_id: ChannelId,
    #[serde(default)]
    guild_id: Option<GuildId>,
    author: User,
    #[serde(default)]
    member: Option<Member>,
    #[serde(default)]
    mention_roles: Vec<RoleId>,
}

#[derive(Debug, Deserialize)]
struct ReactionChange {
    user_id: UserId,
    channel_id: ChannelId,
    message_id: MessageId,
    #[serde(default)]
    guild_id: Option<GuildId>,
    /// Only present on adds inside guilds
    #[serde(default)]
    member: Option<Member>,
    emoji: Emoji,
}

#[derive(Debug, Deserialize)]
struct PartialChannel {
    id: ChannelId,
}

#[derive(Debug, Deserialize)]
struct CommandData {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Interaction {
    id: InteractionId,
    application_id: ApplicationId,
    #[serde(rename = "type")]
    kind: u8,
    token: String,
    #[serde(default)]
    channel_id: Option<ChannelId>,
    #[serde(default)]
    channel: Option<PartialChannel>,
    #[serde(default)]
    member: Option<Member>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    data: Option<CommandData>,
}

fn decode<T: serde::de::DeserializeOwned>(event: &str, data: Value) -> Result<T, GatewayError> {
    serde_json::from_value(data).map_err(|e| GatewayError::Decode(format!("{}: {}", event, e)))
}

/// Translate a dispatch into a lineup event
///
/// Returns `Ok(None)` for dispatches the bot does not care about.
pub fn translate_dispatch(
    event: &str,
    data: Value,
    received_at: DateTime<Utc>,
) -> Result<Option<LineupEvent>, GatewayError> {
    let translated = match event {
        "READY" => {
            let ready: Ready = decode(event, data)?;
            Some(LineupEvent::Connected {
                bot_user_id: ready.user.id,
                application_id: ready.application.id,
                session_started: received_at,
            })
        }
        "MESSAGE_CREATE" => {
            let message: MessageCreate = decode(event, data)?;
            let author_display_name = message
                .member
                .as_ref()
                .and_then(|m| m.display_name(Some(&message.author)))
                .unwrap_or_else(|| message.author.display_name().to_string());
            Some(LineupEvent::MessageReceived(InboundMessage {
                channel_id: message.channel_id,
                message_id: message.id,
                guild_id: message.guild_id,
                author_id: message.author.id,
                author_display_name,
                mentioned_roles: message.mention_roles,
            }))
        }
        "MESSAGE_REACTION_ADD" => {
            let change: ReactionChange = decode(event, data)?;
            Some(LineupEvent::ReactionAdded(reaction_event(change)))
        }
        "MESSAGE_REACTION_REMOVE" => {
            let change: ReactionChange = decode(event, data)?;
            Some(LineupEvent::ReactionRemoved(reaction_event(change)))
        }
        "INTERACTION_CREATE" => {
            let interaction: Interaction = decode(event, data)?;
            command_invocation(interaction).map(LineupEvent::CommandInvoked)
        }
        _ => None,
    };
    Ok(translated)
}

/// Rich form when the payload carries a resolvable member, raw otherwise
fn reaction_event(change: ReactionChange) -> ReactionEvent {
    let form = match change.member.as_ref().and_then(|m| m.display_name(None)) {
        Some(display_name) => ReactionForm::Rich { display_name },
        None => ReactionForm::Raw,
    };
    ReactionEvent {
        channel_id: change.channel_id,
        message_id: change.message_id,
        user_id: change.user_id,
        guild_id: change.guild_id,
        emoji: change.emoji.into(),
        form,
    }
}

fn command_invocation(interaction: Interaction) -> Option<CommandInvocation> {
    if interaction.kind != INTERACTION_APPLICATION_COMMAND {
        return None;
    }
    let command = SlashCommand::from_name(&interaction.data.as_ref()?.name)?;
    let channel_id = interaction
        .channel_id
        .or(interaction.channel.as_ref().map(|c| c.id))?;
    let invoked_by = interaction
        .member
        .as_ref()
        .and_then(|m| m.user.as_ref())
        .or(interaction.user.as_ref())
        .map(|u| u.id)?;

    Some(CommandInvocation {
        command,
        interaction: InteractionRef {
            id: interaction.id,
            application_id: interaction.application_id,
            token: interaction.token,
        },
        channel_id,
        invoked_by,
    })
}
