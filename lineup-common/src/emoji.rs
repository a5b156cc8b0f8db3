//! Emoji value types
//!
//! [`EmojiRef`] is what the platform reports on a reaction; [`ReactionEmoji`] is what the
//! operator configured. Comparing the two is the emoji matcher's job (lineup-bot).

use serde::Deserialize;
use std::fmt;

/// Placeholder name used when only a custom emoji id is configured.
///
/// The platform identifies custom emoji by id; the name part of `name:id` is not checked.
const CUSTOM_EMOJI_PLACEHOLDER: &str = "lineup";

/// Emoji as observed on a reaction or message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmojiRef {
    /// Custom emoji id (None for unicode emoji)
    pub id: Option<u64>,
    /// Unicode character(s), or the custom emoji's short name
    pub name: Option<String>,
    pub animated: bool,
}

impl EmojiRef {
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            animated: false,
        }
    }

    pub fn custom(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
            animated: false,
        }
    }

    /// Form used in reaction REST paths: `name:id` for custom emoji, the character otherwise
    pub fn api_form(&self) -> String {
        match (self.id, self.name.as_deref()) {
            (Some(id), Some(name)) => format!("{}:{}", name, id),
            (Some(id), None) => format!("{}:{}", CUSTOM_EMOJI_PLACEHOLDER, id),
            (None, Some(name)) => name.to_string(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for EmojiRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => {
                let prefix = if self.animated { "a" } else { "" };
                let name = self.name.as_deref().unwrap_or(CUSTOM_EMOJI_PLACEHOLDER);
                write!(f, "<{}:{}:{}>", prefix, name, id)
            }
            None => f.write_str(self.name.as_deref().unwrap_or("")),
        }
    }
}

/// Configured reaction emoji
///
/// In TOML either a string (`reaction_emoji = "✅"`) or a custom emoji id
/// (`reaction_emoji = 1234567890`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ReactionEmoji {
    Custom(u64),
    Unicode(String),
}

impl ReactionEmoji {
    /// Text shown to users, e.g. in the empty-lineup hint
    pub fn label(&self) -> String {
        match self {
            ReactionEmoji::Custom(id) => format!("<:{}:{}>", CUSTOM_EMOJI_PLACEHOLDER, id),
            ReactionEmoji::Unicode(s) => s.clone(),
        }
    }

    /// Form used in reaction REST paths (not yet URL-encoded)
    pub fn api_form(&self) -> String {
        match self {
            ReactionEmoji::Custom(id) => format!("{}:{}", CUSTOM_EMOJI_PLACEHOLDER, id),
            ReactionEmoji::Unicode(s) => s.clone(),
        }
    }
}

impl Default for ReactionEmoji {
    fn default() -> Self {
        ReactionEmoji::Unicode("✅".to_string())
    }
}

impl fmt::Display for ReactionEmoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReactionEmoji::Custom(id) => write!(f, "{}", id),
            ReactionEmoji::Unicode(s) => f.write_str(s),
        }
    }
}
