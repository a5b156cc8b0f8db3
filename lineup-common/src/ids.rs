//! Platform identifiers
//!
//! Discord assigns 64-bit "snowflake" ids to every user, channel, message and role.
//! On the wire they travel as JSON strings; in TOML configuration they are plain
//! integers. The newtypes below accept both and always serialize as strings.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(SnowflakeVisitor).map(Self)
            }
        }
    };
}

struct SnowflakeVisitor;

impl<'de> Visitor<'de> for SnowflakeVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake id as string or unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
        u64::try_from(value).map_err(|_| E::custom(format!("negative snowflake id: {}", value)))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
        value
            .parse::<u64>()
            .map_err(|_| E::custom(format!("invalid snowflake id: {:?}", value)))
    }
}

snowflake_id!(
    /// User id (also used for the bot's own account)
    UserId
);
snowflake_id!(
    /// Text channel id (guild channel or DM)
    ChannelId
);
snowflake_id!(
    /// Message id, unique platform-wide
    MessageId
);
snowflake_id!(
    /// Guild role id
    RoleId
);
snowflake_id!(
    /// Guild (server) id
    GuildId
);
snowflake_id!(
    /// Application id, needed for command registration and interaction follow-ups
    ApplicationId
);
snowflake_id!(
    /// Interaction id, paired with the interaction token for callbacks
    InteractionId
);

/// A (channel, message) pair
///
/// Used both for anchor messages and for the location of the lineup display message.
/// Only ids are held; the message itself is re-resolved through the platform on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl MessageRef {
    pub fn new(channel_id: ChannelId, message_id: MessageId) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.channel_id, self.message_id)
    }
}
