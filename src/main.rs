//! repcount-daemon: background repetition counter for camera coaching
//!
//! Sits between an external pose estimator and a UI:
//! - Pose sources submit per-frame landmarks over a Unix socket
//! - A single state machine task turns them into a repetition count
//! - UI clients read the count or subscribe to change notifications
//!
//! Camera capture, pose detection and rendering all live elsewhere.

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use repcount::config::Config;
use repcount::counter::RepStateMachine;
use repcount::events::RepEvent;
use repcount::ipc::Server;
use repcount::lifecycle::ShutdownSignal;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "repcount-daemon starting");

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    config
        .ensure_dirs()
        .context("failed to create data directory")?;
    info!(
        ?config.socket_path,
        up = config.thresholds.up_angle_deg,
        down = config.thresholds.down_angle_deg,
        min_confidence = config.thresholds.min_confidence,
        "configuration loaded"
    );

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // IPC server -> state machine (frames and resets)
    let (command_tx, command_rx) = mpsc::channel(64);
    // State machine -> IPC server and subscribers
    let (event_tx, _event_rx) = broadcast::channel::<RepEvent>(256);

    let mut state_machine = RepStateMachine::new(config.thresholds, event_tx.clone());

    let server = Server::new(&config.socket_path, command_tx, event_tx.clone())?;

    // Subscribe before anything can be counted
    let sync_rx = event_tx.subscribe();

    info!("daemon initialized, entering main loop");

    // Main event loop
    tokio::select! {
        // Run the state machine (processes frames)
        _ = state_machine.run(command_rx) => {
            info!("state machine exited");
        }

        // Run the IPC server (accepts client connections)
        result = server.run() => {
            if let Err(e) = result {
                error!(?e, "IPC server error");
            }
        }

        // Mirror counter state into the server's status snapshot
        _ = server.sync_events(sync_rx) => {
            info!("state event handler exited");
        }

        // Wait for shutdown signal
        result = shutdown.wait() => {
            match result {
                Ok(()) => info!("shutdown signal received"),
                Err(e) => error!(?e, "shutdown signal handler failed"),
            }
        }
    }

    // Cleanup
    info!("shutting down...");

    server.shutdown().await;

    info!(count = state_machine.count(), "repcount-daemon stopped");

    Ok(())
}
