//! Lineup session state
//!
//! Roster, anchor registry and display location travel together as one bundle. The router
//! keeps the bundle behind a single async mutex so that a handler's guard checks, mutation
//! and display sync are never split by another handler.

use lineup_common::config::LineupConfig;
use lineup_common::MessageRef;

use crate::anchors::AnchorRegistry;
use crate::display::LineupDisplay;
use crate::roster::{Participant, Roster};

/// State owned by the event router for one process
#[derive(Debug)]
pub struct LineupState {
    pub roster: Roster,
    pub anchors: AnchorRegistry,
    pub display: LineupDisplay,
}

impl LineupState {
    pub fn new(config: &LineupConfig) -> Self {
        Self {
            roster: Roster::new(config.max_participants, config.reaction_emoji.label()),
            anchors: AnchorRegistry::new(),
            display: LineupDisplay::new(),
        }
    }

    /// Forget participants and anchors at session start
    ///
    /// The display location survives; the next sync re-fetches or recreates it.
    pub fn reset_session(&mut self) {
        self.roster.clear();
        self.anchors.reset_all();
    }

    /// Read-only copy for inspection
    pub fn snapshot(&self) -> LineupSnapshot {
        LineupSnapshot {
            participants: self.roster.participants().cloned().collect(),
            anchors: self.anchors.iter().copied().collect(),
            display: self.display.location(),
            rendered: self.roster.render(),
        }
    }
}

/// Point-in-time view of [`LineupState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupSnapshot {
    /// Participants in join order
    pub participants: Vec<Participant>,
    pub anchors: Vec<MessageRef>,
    pub display: Option<MessageRef>,
    /// Current roster text
    pub rendered: String,
}

impl LineupSnapshot {
    pub fn participant_names(&self) -> Vec<&str> {
        self.participants
            .iter()
            .map(|p| p.display_name.as_str())
            .collect()
    }
}
