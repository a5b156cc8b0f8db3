//! Event types for the lineup event system
//!
//! Provides the closed set of inbound platform events and the EventBus that carries
//! them from the gateway to the event router.

// Sub-modules (supporting types)
mod command_types;
mod message_types;
mod reaction_types;

pub use command_types::{CommandInvocation, InteractionRef, SlashCommand};
pub use message_types::InboundMessage;
pub use reaction_types::{ReactionEvent, ReactionForm};

use tokio::sync::broadcast;

use crate::ids::{ApplicationId, UserId};

/// Inbound platform events
///
/// Every event the router reacts to is one of these variants, so dispatch is an
/// exhaustive match and the router can be driven with synthetic events in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineupEvent {
    /// Session established or re-established
    ///
    /// Triggers:
    /// - Router: forget roster and anchors
    /// - Event loop: (re)register slash commands
    Connected {
        /// The bot's own user id, used to ignore self-caused events
        bot_user_id: UserId,
        application_id: ApplicationId,
        /// When the gateway reported the session ready
        session_started: chrono::DateTime<chrono::Utc>,
    },

    /// New message posted in a channel the bot can see
    ///
    /// Triggers:
    /// - Router: anchor promotion when a target role is mentioned
    MessageReceived(InboundMessage),

    /// Reaction added to a message
    ///
    /// Triggers:
    /// - Router: join the lineup (anchor messages only)
    ReactionAdded(ReactionEvent),

    /// Reaction removed from a message
    ///
    /// Triggers:
    /// - Router: leave the lineup (anchor messages only)
    ReactionRemoved(ReactionEvent),

    /// Slash command invoked
    CommandInvoked(CommandInvocation),
}

impl LineupEvent {
    /// Short name for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            LineupEvent::Connected { .. } => "connected",
            LineupEvent::MessageReceived(_) => "message_received",
            LineupEvent::ReactionAdded(_) => "reaction_added",
            LineupEvent::ReactionRemoved(_) => "reaction_removed",
            LineupEvent::CommandInvoked(_) => "command_invoked",
        }
    }
}

/// Gateway → router channel
///
/// Fan-out over `tokio::sync::broadcast`: the gateway never waits on the router, and a
/// receiver that falls more than `capacity` events behind sees `Lagged` and skips ahead.
/// Only events emitted after [`EventBus::subscribe`] reach a receiver, so the event loop
/// subscribes before the gateway connects.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LineupEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LineupEvent> {
        self.tx.subscribe()
    }

    /// Publish an event; returns how many receivers got it (0 means it was dropped)
    pub fn emit(&self, event: LineupEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}
