//! Signal-driven lifecycle supervision.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::daemon::Daemon;
use crate::error::DaemonError;

/// Owns the OS-visible lifecycle of the daemon.
///
/// Builds the daemon from a validated configuration, bridges the process
/// termination signal to the daemon's cooperative stop, and blocks on the
/// daemon's run loop.
pub struct Supervisor {
    daemon: Arc<Daemon>,
}

impl Supervisor {
    /// Build the daemon from a validated configuration.
    ///
    /// No background work starts here; the signal subscription is taken in
    /// [`Supervisor::run`].
    pub fn new(config: Config) -> Self {
        Self {
            daemon: Arc::new(Daemon::new(config)),
        }
    }

    /// A handle to the supervised daemon, for requesting a stop from
    /// elsewhere.
    pub fn daemon(&self) -> Arc<Daemon> {
        Arc::clone(&self.daemon)
    }

    /// Run the daemon until it stops, bridging SIGTERM to its stop method.
    ///
    /// The signal task is spawned before the run loop is entered and is
    /// aborted once the run loop returns, so the subscription never outlives
    /// the supervised lifecycle. Only SIGTERM is handled; SIGINT keeps its
    /// default disposition. The run loop's outcome is returned unchanged.
    pub async fn run(&self) -> Result<(), DaemonError> {
        let daemon = Arc::clone(&self.daemon);
        let signal_task = tokio::spawn(async move {
            let mut term = match tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            ) {
                Ok(term) => term,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };

            if term.recv().await.is_some() {
                info!("Termination signal received, requesting daemon stop");
                daemon.stop();
            }
        });

        let result = self.daemon.run().await;

        // Release the signal subscription on every exit path.
        signal_task.abort();

        result
    }
}
