//! Slash command event types

use std::fmt;

use crate::ids::{ApplicationId, ChannelId, InteractionId, UserId};

/// Slash commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlashCommand {
    /// Clear the lineup and forget every anchor
    Clear,
    /// Liveness check
    Ping,
}

impl SlashCommand {
    pub const ALL: [SlashCommand; 2] = [SlashCommand::Clear, SlashCommand::Ping];

    /// Registered command name
    pub fn name(self) -> &'static str {
        match self {
            SlashCommand::Clear => "clear",
            SlashCommand::Ping => "ping",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Clear => "Clear the lineup and disregard previous role mention(s).",
            SlashCommand::Ping => "Check if the bot is alive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for SlashCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// Handle needed to answer an interaction
///
/// The token is valid for 15 minutes; the initial callback must happen within 3 seconds.
#[derive(Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: InteractionId,
    pub application_id: ApplicationId,
    pub token: String,
}

// Token stays out of logs.
impl fmt::Debug for InteractionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionRef")
            .field("id", &self.id)
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}

/// A slash command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command: SlashCommand,
    pub interaction: InteractionRef,
    /// Channel the command was invoked in
    pub channel_id: ChannelId,
    pub invoked_by: UserId,
}
