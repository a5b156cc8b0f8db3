//! Emoji matcher

use lineup_common::{EmojiRef, ReactionEmoji};

/// Does an observed emoji count as the configured reaction?
///
/// A configured custom emoji matches by id only. A configured unicode value matches the
/// observed short name or the observed emoji's full rendering.
pub fn matches(observed: &EmojiRef, configured: &ReactionEmoji) -> bool {
    match configured {
        ReactionEmoji::Custom(id) => observed.id == Some(*id),
        ReactionEmoji::Unicode(expected) => {
            observed.name.as_deref() == Some(expected.as_str())
                || observed.to_string() == *expected
        }
    }
}
