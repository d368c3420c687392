use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::error::Result;

/// Graceful shutdown coordinator
pub struct GracefulShutdown {
    shutdown_tx: broadcast::Sender<()>,
    drain_timeout: Duration,
}

impl GracefulShutdown {
    pub fn new(drain_timeout: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            shutdown_tx,
            drain_timeout,
        }
    }

    pub fn sender(&self) -> &broadcast::Sender<()> {
        &self.shutdown_tx
    }

    /// Get a shutdown receiver for components to listen on
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal every listener, then wait for the server task to wind down.
    pub async fn shutdown(&self, server: JoinHandle<Result<()>>) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Failed to send shutdown signal: {}", e);
        }

        match timeout(self.drain_timeout, server).await {
            Ok(Ok(Ok(()))) => info!("Graceful shutdown completed"),
            Ok(Ok(Err(e))) => error!("Server stopped with error: {}", e),
            Ok(Err(e)) => error!("Server task panicked: {}", e),
            Err(_) => warn!(
                "Server did not stop within {:?}, exiting anyway",
                self.drain_timeout
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DnsError;

    #[tokio::test]
    async fn test_shutdown_reaches_subscribers() {
        let shutdown = GracefulShutdown::new(Duration::from_secs(1));
        let mut rx = shutdown.subscribe();
        let task = tokio::spawn(async move {
            rx.recv().await.ok();
            Ok::<(), DnsError>(())
        });

        shutdown.shutdown(task).await;
    }

    #[tokio::test]
    async fn test_shutdown_times_out_on_stuck_task() {
        let shutdown = GracefulShutdown::new(Duration::from_millis(50));
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<(), DnsError>(())
        });

        let started = std::time::Instant::now();
        shutdown.shutdown(task).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
