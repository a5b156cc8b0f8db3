//! Event router
//!
//! Single entry point for inbound platform events. Applies the guards (self events, emoji,
//! anchor membership) and then mutates the lineup state and re-renders the display.
//!
//! | Event | Guard | Action |
//! |---|---|---|
//! | message | not from bot, mentions a target role | react, promote anchor, auto-join author |
//! | reaction added | not bot, emoji matches, anchor | join; full-lineup notice (rich form only) |
//! | reaction removed | not bot, emoji matches, anchor | leave |
//! | `/clear` | none | ack, clear roster, forget anchors, retract reactions, re-render |
//! | connected | none | clear roster, forget anchors |
//!
//! Platform failures never leave this module: each one is either the trigger for a
//! documented fallback or logged and discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lineup_common::config::LineupConfig;
use lineup_common::events::{CommandInvocation, InboundMessage, LineupEvent, ReactionEvent, SlashCommand};
use lineup_common::{ChannelId, MessageRef, UserId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::emoji;
use crate::platform::ChatPlatform;
use crate::state::{LineupSnapshot, LineupState};

/// Reply to `/clear`
pub const CLEAR_CONFIRMATION: &str = "🧹 Lineup cleared. Old mentions are no longer active.";

/// Reply to `/ping`
pub const PING_REPLY: &str = "Pong! 🏓";

/// Text of the "lineup full" notice
pub fn full_notice(capacity: usize) -> String {
    format!("⚠️ The lineup is already full (max {}).", capacity)
}

/// Routes [`LineupEvent`]s to lineup state changes
pub struct EventRouter<P: ChatPlatform + ?Sized> {
    platform: Arc<P>,
    config: Arc<LineupConfig>,
    state: Mutex<LineupState>,
    /// Bot's own user id; 0 until the first `Connected` event
    bot_user_id: AtomicU64,
}

impl<P: ChatPlatform + ?Sized> EventRouter<P> {
    pub fn new(platform: Arc<P>, config: Arc<LineupConfig>) -> Self {
        let state = LineupState::new(&config);
        Self {
            platform,
            config,
            state: Mutex::new(state),
            bot_user_id: AtomicU64::new(0),
        }
    }

    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    pub fn config(&self) -> &LineupConfig {
        &self.config
    }

    /// Bot's user id, once known
    pub fn bot_user_id(&self) -> Option<UserId> {
        match self.bot_user_id.load(Ordering::Acquire) {
            0 => None,
            id => Some(UserId(id)),
        }
    }

    /// Copy of the current lineup state
    pub async fn snapshot(&self) -> LineupSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Handle one event to completion
    pub async fn handle(&self, event: LineupEvent) {
        debug!(kind = event.kind(), "Routing event");
        match event {
            LineupEvent::Connected {
                bot_user_id,
                application_id,
                session_started,
            } => {
                self.bot_user_id.store(bot_user_id.get(), Ordering::Release);
                self.state.lock().await.reset_session();
                info!(
                    bot_user_id = %bot_user_id,
                    application_id = %application_id,
                    session_started = %session_started,
                    "Session started; lineup and anchors reset"
                );
            }
            LineupEvent::MessageReceived(message) => self.on_message(message).await,
            LineupEvent::ReactionAdded(reaction) => self.on_reaction_added(reaction).await,
            LineupEvent::ReactionRemoved(reaction) => self.on_reaction_removed(reaction).await,
            LineupEvent::CommandInvoked(invocation) => self.on_command(invocation).await,
        }
    }

    fn is_self(&self, user: UserId) -> bool {
        self.bot_user_id() == Some(user)
    }

    /// Shared guard for reaction events, minus the anchor check (needs the state lock)
    fn reaction_is_relevant(&self, reaction: &ReactionEvent) -> bool {
        !self.is_self(reaction.user_id) && emoji::matches(&reaction.emoji, &self.config.reaction_emoji)
    }

    async fn on_message(&self, message: InboundMessage) {
        if self.is_self(message.author_id) {
            return;
        }
        if !message
            .mentioned_roles
            .iter()
            .any(|role| self.config.is_target_role(*role))
        {
            return;
        }

        let anchor = message.message_ref();
        let mut state = self.state.lock().await;

        if let Err(e) = self
            .platform
            .add_reaction(anchor, &self.config.reaction_emoji)
            .await
        {
            warn!(message = %anchor, error = %e, "Reaction/anchor setup failed");
            return;
        }

        if state.anchors.promote(anchor) {
            info!(message = %anchor, "Message promoted to lineup anchor");
        }

        if state
            .roster
            .try_add(message.author_id, message.author_display_name.clone())
        {
            info!(user_id = %message.author_id, name = %message.author_display_name, "Author joined lineup");
            self.sync_display(&mut state, message.channel_id).await;
        }
    }

    async fn on_reaction_added(&self, reaction: ReactionEvent) {
        if !self.reaction_is_relevant(&reaction) {
            return;
        }

        let mut state = self.state.lock().await;
        if !state.anchors.is_anchor(reaction.message_ref()) {
            return;
        }

        let display_name = self.resolve_display_name(&reaction).await;
        if state.roster.try_add(reaction.user_id, display_name.clone()) {
            info!(user_id = %reaction.user_id, name = %display_name, "Joined lineup");
            self.sync_display(&mut state, reaction.channel_id).await;
            return;
        }

        // Raw notifications stay silent: the rich one for the same reaction notifies.
        // A participant re-reacting was refused as a duplicate, not for capacity, so no notice.
        if reaction.is_rich() && !state.roster.contains(reaction.user_id) && state.roster.is_full() {
            let notice = full_notice(state.roster.capacity());
            if let Err(e) = self.platform.send_notice(reaction.channel_id, &notice).await {
                debug!(channel_id = %reaction.channel_id, error = %e, "Full-lineup notice not delivered");
            }
        }
    }

    async fn on_reaction_removed(&self, reaction: ReactionEvent) {
        if !self.reaction_is_relevant(&reaction) {
            return;
        }

        let mut state = self.state.lock().await;
        if !state.anchors.is_anchor(reaction.message_ref()) {
            return;
        }

        if state.roster.try_remove(reaction.user_id) {
            info!(user_id = %reaction.user_id, "Left lineup");
            self.sync_display(&mut state, reaction.channel_id).await;
        }
    }

    async fn on_command(&self, invocation: CommandInvocation) {
        info!(command = %invocation.command, user_id = %invocation.invoked_by, "Command invoked");
        match invocation.command {
            SlashCommand::Ping => {
                if let Err(e) = self
                    .platform
                    .respond_interaction(&invocation.interaction, PING_REPLY)
                    .await
                {
                    warn!(error = %e, "Ping reply failed");
                }
            }
            SlashCommand::Clear => self.clear_lineup(&invocation).await,
        }
    }

    /// `/clear`: forget the lineup and every anchor
    async fn clear_lineup(&self, invocation: &CommandInvocation) {
        // Ack first; the platform only waits a few seconds for it.
        if let Err(e) = self.platform.defer_interaction(&invocation.interaction).await {
            warn!(error = %e, "Could not acknowledge /clear");
        }

        {
            let mut state = self.state.lock().await;
            state.roster.clear();
            let anchors = state.anchors.reset_all();
            info!(anchors = anchors.len(), "Lineup cleared; retracting anchor reactions");

            for anchor in anchors {
                self.retract_own_reaction(anchor).await;
            }

            self.sync_display(&mut state, invocation.channel_id).await;
        }

        if let Err(e) = self
            .platform
            .finish_interaction(&invocation.interaction, CLEAR_CONFIRMATION)
            .await
        {
            warn!(error = %e, "Could not finalize /clear response");
        }
    }

    /// Best effort: remove the bot's reaction from a former anchor
    async fn retract_own_reaction(&self, anchor: MessageRef) {
        let message = match self.platform.fetch_message(anchor).await {
            Ok(message) => message,
            Err(e) => {
                debug!(message = %anchor, error = %e, "Former anchor not fetchable; skipping");
                return;
            }
        };

        for reaction in message
            .reactions
            .iter()
            .filter(|r| r.me && emoji::matches(&r.emoji, &self.config.reaction_emoji))
        {
            if let Err(e) = self
                .platform
                .remove_own_reaction(anchor, &reaction.emoji)
                .await
            {
                debug!(message = %anchor, error = %e, "Reaction retraction failed; skipping");
            }
        }
    }

    /// Display name for a reacting user: rich payload, guild member, then `user_<id>`
    async fn resolve_display_name(&self, reaction: &ReactionEvent) -> String {
        if let Some(name) = reaction.display_name() {
            return name.to_string();
        }

        if let Some(guild) = reaction.guild_id {
            match self.platform.member_display_name(guild, reaction.user_id).await {
                Ok(Some(name)) => return name,
                Ok(None) => {}
                Err(e) => {
                    debug!(user_id = %reaction.user_id, error = %e, "Member lookup failed");
                }
            }
        }

        format!("user_{}", reaction.user_id)
    }

    async fn sync_display(&self, state: &mut LineupState, channel: ChannelId) {
        let content = state.roster.render();
        if let Err(e) = state
            .display
            .sync_to(&*self.platform, channel, &content)
            .await
        {
            warn!(channel_id = %channel, error = %e, "Lineup display update failed");
        }
    }
}
