//! Lineup Bot (lineup-bot) - Main entry point
//!
//! Connects to the Discord gateway and runs the lineup until interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lineup_bot::gateway::GatewayClient;
use lineup_bot::runner::run_event_loop;
use lineup_bot::{DiscordClient, EventRouter};
use lineup_common::config::ConfigResolver;
use lineup_common::events::EventBus;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Capacity of the gateway → router event channel
const EVENT_BUS_CAPACITY: usize = 1000;

/// Command-line arguments for lineup-bot
#[derive(Parser, Debug)]
#[command(name = "lineup-bot")]
#[command(about = "Reaction-driven lineup bot for Discord")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Discord bot token (overrides the config file)
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level when RUST_LOG is not set (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loading logs nothing; its notes are reported once tracing is up
    let loaded = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;

    // Initialize tracing
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| loaded.config.logging.level.clone());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lineup_bot={level},lineup_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lineup Bot v{}", env!("CARGO_PKG_VERSION"));
    loaded.log_summary();
    let config = loaded.config;

    let token = config
        .resolve_token(args.token.as_deref())
        .context("No Discord token available")?;

    info!(
        target_roles = config.target_role_ids.len(),
        emoji = %config.reaction_emoji,
        max_participants = config.max_participants,
        "Configuration loaded"
    );

    let platform = Arc::new(DiscordClient::new(token.clone()).context("Failed to build Discord client")?);
    let router = Arc::new(EventRouter::new(platform, Arc::new(config)));

    let bus = EventBus::new(EVENT_BUS_CAPACITY);
    // Subscribe before the gateway can emit READY
    let events = bus.subscribe();
    let gateway = GatewayClient::new(token, bus);

    let event_loop = tokio::spawn(run_event_loop(router, events));

    tokio::select! {
        result = gateway.run() => {
            if let Err(e) = result {
                error!(error = %e, "Gateway stopped");
                event_loop.abort();
                return Err(e).context("Gateway failed");
            }
        }
        _ = shutdown_signal() => {}
    }

    event_loop.abort();
    info!("Shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
