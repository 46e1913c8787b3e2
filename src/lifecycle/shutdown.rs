//! Signal handling for graceful shutdown

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::debug;

/// Resolves on SIGTERM, SIGINT, or an in-process `trigger()`
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<Notify>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown from inside the process
    ///
    /// Stored as a permit, so a `wait()` that starts later still returns.
    pub fn trigger(&self) {
        self.requested.notify_one();
    }

    /// Wait for a shutdown signal
    pub async fn wait(&self) -> Result<()> {
        let mut sigterm =
            signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("failed to register SIGINT handler")?;

        tokio::select! {
            _ = sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = sigint.recv() => {
                debug!("received SIGINT");
            }
            _ = self.requested.notified() => {
                debug!("shutdown requested");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_before_wait() {
        let shutdown = ShutdownSignal::new();
        shutdown.clone().trigger();
        assert!(shutdown.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_from_task() {
        let shutdown = ShutdownSignal::new();
        let remote = shutdown.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            remote.trigger();
        });
        assert!(shutdown.wait().await.is_ok());
    }
}
