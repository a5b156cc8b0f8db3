//! Lineup display synchronizer
//!
//! Keeps exactly one message showing the current roster. The message is found again by
//! its recorded ids on every sync; if it has disappeared (deleted, channel gone) a fresh
//! one is posted and its ids replace the old ones.

use lineup_common::{ChannelId, MessageRef};
use tracing::{debug, info};

use crate::platform::{ChatPlatform, PlatformResult};

/// Location of the rendered lineup message
#[derive(Debug, Default)]
pub struct LineupDisplay {
    location: Option<MessageRef>,
}

impl LineupDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently recorded display message, if any
    pub fn location(&self) -> Option<MessageRef> {
        self.location
    }

    /// Make the display message show `content`
    ///
    /// 1. A recorded message that can still be fetched is edited in place.
    /// 2. Otherwise (nothing recorded, fetch failed, or the edit failed) a new message is
    ///    sent to `channel` and recorded.
    ///
    /// Only the final send can fail; fetch and edit failures are the recreate signal.
    /// At most one message is edited per call.
    pub async fn sync_to<P: ChatPlatform + ?Sized>(
        &mut self,
        platform: &P,
        channel: ChannelId,
        content: &str,
    ) -> PlatformResult<MessageRef> {
        if let Some(location) = self.location {
            match platform.fetch_message(location).await {
                Ok(message) => match platform.edit_message(message.location, content).await {
                    Ok(()) => {
                        debug!(message = %message.location, "Lineup display edited");
                        return Ok(message.location);
                    }
                    Err(e) => {
                        debug!(message = %location, error = %e, "Lineup display edit failed; recreating");
                    }
                },
                Err(e) => {
                    debug!(message = %location, error = %e, "Lineup display missing; recreating");
                }
            }
        }

        let created = platform.send_message(channel, content).await?;
        info!(message = %created, "Lineup display posted");
        self.location = Some(created);
        Ok(created)
    }
}
