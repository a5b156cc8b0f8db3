//! Anchor registry
//!
//! Messages whose reactions drive lineup membership. Entries are added by promotion and
//! only ever leave all at once through [`AnchorRegistry::reset_all`].

use lineup_common::MessageRef;
use std::collections::BTreeSet;

/// Set of anchor messages
///
/// Ordered by (channel, message) id. Snowflake ids grow with creation time, so iteration
/// order within a channel is promotion order.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    anchors: BTreeSet<MessageRef>,
}

impl AnchorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a message as an anchor (idempotent)
    ///
    /// Returns true if the message was not an anchor before.
    pub fn promote(&mut self, message: MessageRef) -> bool {
        self.anchors.insert(message)
    }

    pub fn is_anchor(&self, message: MessageRef) -> bool {
        self.anchors.contains(&message)
    }

    /// Forget every anchor, returning the ones that were present
    pub fn reset_all(&mut self) -> Vec<MessageRef> {
        std::mem::take(&mut self.anchors).into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageRef> {
        self.anchors.iter()
    }
}
