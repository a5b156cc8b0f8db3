//! Lineup roster
//!
//! Ordered, deduplicated, capacity-bounded list of participants plus the display names
//! captured when each one joined.
//!
//! **Invariants:**
//! - No user id appears twice
//! - Length never exceeds capacity
//! - `order` and `participants` always hold the same set of ids

use lineup_common::UserId;
use std::collections::HashMap;

/// A lineup member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: UserId,
    /// Snapshot taken at join time; not refreshed
    pub display_name: String,
}

/// Participants in join order
#[derive(Debug)]
pub struct Roster {
    capacity: usize,
    /// Emoji label shown in the empty-state hint
    join_emoji: String,
    /// Join order
    order: Vec<UserId>,
    participants: HashMap<UserId, Participant>,
}

impl Roster {
    /// Create an empty roster
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of participants (at least 1)
    /// * `join_emoji` - Emoji text used in the "react to join" hint
    pub fn new(capacity: usize, join_emoji: impl Into<String>) -> Self {
        Self {
            capacity: capacity.max(1),
            join_emoji: join_emoji.into(),
            order: Vec::with_capacity(capacity),
            participants: HashMap::with_capacity(capacity),
        }
    }

    /// Add a participant at the end of the lineup
    ///
    /// Returns false (and changes nothing) if the user is already in or the lineup is full.
    pub fn try_add(&mut self, user_id: UserId, display_name: impl Into<String>) -> bool {
        if self.participants.contains_key(&user_id) || self.is_full() {
            return false;
        }
        self.order.push(user_id);
        self.participants.insert(
            user_id,
            Participant {
                user_id,
                display_name: display_name.into(),
            },
        );
        true
    }

    /// Remove a participant, keeping everyone else's relative order
    ///
    /// Returns false if the user was not in the lineup.
    pub fn try_remove(&mut self, user_id: UserId) -> bool {
        if self.participants.remove(&user_id).is_none() {
            return false;
        }
        self.order.retain(|id| *id != user_id);
        true
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.participants.clear();
    }

    pub fn contains(&self, user_id: UserId) -> bool {
        self.participants.contains_key(&user_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.order.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Participants in join order
    pub fn participants(&self) -> impl Iterator<Item = &Participant> + '_ {
        self.order.iter().filter_map(|id| self.participants.get(id))
    }

    /// Message text for the lineup display
    pub fn render(&self) -> String {
        if self.is_empty() {
            return format!(
                "📭 **Lineup is empty.** React with {} to join.",
                self.join_emoji
            );
        }

        let header = if self.is_full() {
            let mentions = self
                .order
                .iter()
                .map(|id| format!("<@{}>", id))
                .collect::<Vec<_>>()
                .join(" ");
            format!("📋 **Current Lineup (READY)** — {}", mentions)
        } else {
            "📋 **Current Lineup**".to_string()
        };

        let lines = self
            .participants()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p.display_name))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}\n{}", header, lines)
    }
}
