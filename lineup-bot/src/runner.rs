//! Event loop
//!
//! Drains the [`EventBus`] into the [`EventRouter`].
//!
//! Message and reaction events are routed one after another in arrival order, so an add
//! and a later remove for the same user can never swap. Slash commands run on their own
//! task: their acknowledgment has a hard deadline and must not queue behind other events.

use std::sync::Arc;

use lineup_common::events::{LineupEvent, SlashCommand};
use lineup_common::ApplicationId;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::platform::ChatPlatform;
use crate::router::EventRouter;

/// Route events until the bus closes
pub async fn run_event_loop<P>(router: Arc<EventRouter<P>>, mut rx: broadcast::Receiver<LineupEvent>)
where
    P: ChatPlatform + ?Sized + 'static,
{
    info!("Event loop started");
    loop {
        let event = match rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event loop lagged; events dropped");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match event {
            LineupEvent::Connected { application_id, .. } => {
                spawn_command_registration(Arc::clone(router.platform()), application_id);
                router.handle(event).await;
            }
            LineupEvent::CommandInvoked(_) => {
                let router = Arc::clone(&router);
                tokio::spawn(async move { router.handle(event).await });
            }
            other => router.handle(other).await,
        }
    }
    info!("Event loop stopped");
}

/// Register slash commands in the background; failure only costs the commands
fn spawn_command_registration<P>(platform: Arc<P>, application_id: ApplicationId)
where
    P: ChatPlatform + ?Sized + 'static,
{
    tokio::spawn(async move {
        match platform
            .register_commands(application_id, &SlashCommand::ALL)
            .await
        {
            Ok(()) => info!(count = SlashCommand::ALL.len(), "Synced slash command(s)"),
            Err(e) => warn!(error = %e, "Slash command sync failed"),
        }
    });
}
