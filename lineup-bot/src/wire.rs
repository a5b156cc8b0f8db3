//! Discord wire models shared by the REST client and the gateway
//!
//! Only the fields the bot reads are modeled; serde ignores the rest.

use lineup_common::{ChannelId, EmojiRef, MessageId, MessageRef, UserId};
use serde::{Deserialize, Deserializer};

/// Discord user object
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Global display name, else username
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Guild member object
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub nick: Option<String>,
    /// Absent on MESSAGE_CREATE (the author is sent separately)
    #[serde(default)]
    pub user: Option<User>,
}

impl Member {
    /// Nickname, else the user's own display name
    ///
    /// `user` is used when the member object does not embed one.
    pub fn display_name(&self, user: Option<&User>) -> Option<String> {
        if let Some(nick) = self.nick.as_deref().filter(|n| !n.is_empty()) {
            return Some(nick.to_string());
        }
        self.user
            .as_ref()
            .or(user)
            .map(|u| u.display_name().to_string())
    }
}

/// Emoji object (partial for reactions)
#[derive(Debug, Clone, Deserialize)]
pub struct Emoji {
    #[serde(default, deserialize_with = "opt_snowflake")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

impl From<Emoji> for EmojiRef {
    fn from(e: Emoji) -> Self {
        EmojiRef {
            id: e.id,
            name: e.name,
            animated: e.animated,
        }
    }
}

/// Reaction group on a message
#[derive(Debug, Clone, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub me: bool,
    pub emoji: Emoji,
}

/// Message object
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Message {
    pub fn location(&self) -> MessageRef {
        MessageRef::new(self.channel_id, self.id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNum {
    Str(String),
    Num(u64),
}

/// Optional snowflake that may be a string, a number or null
fn opt_snowflake<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    match Option::<StrOrNum>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StrOrNum::Num(n)) => Ok(Some(n)),
        Some(StrOrNum::Str(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
