//! Daemon run loop and lifecycle supervision.
//!
//! The [`Daemon`] owns the validated configuration and blocks in [`Daemon::run`]
//! until a cooperative stop is requested. The [`Supervisor`] wires the daemon
//! to the process termination signal.

mod supervisor;

pub use supervisor::Supervisor;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::DaemonError;

/// Interval between liveness log lines while the daemon is running.
const STATUS_INTERVAL: Duration = Duration::from_secs(60);

/// The long-running shell agent daemon.
///
/// Construction only wires dependencies; no background work starts until
/// [`Daemon::run`] is awaited.
pub struct Daemon {
    config: Config,
    shutdown: Notify,
    stop_requested: AtomicBool,
}

impl Daemon {
    /// Create a new daemon from a validated configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shutdown: Notify::new(),
            stop_requested: AtomicBool::new(false),
        }
    }

    /// The configuration the daemon was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Run the daemon until a stop is requested.
    ///
    /// Blocks the calling task. Returns the daemon's terminal outcome once it
    /// has fully stopped.
    pub async fn run(&self) -> Result<(), DaemonError> {
        let server_url = self
            .config
            .servers
            .as_deref()
            .and_then(|servers| servers.first())
            .map(|server| server.server_url.as_str())
            .unwrap_or_default();

        let http = self.config.http_config();
        info!(
            server = %server_url,
            user = %self.config.user,
            shell = %self.config.shell_command,
            https = http.is_https,
            mutual_tls = http.client.is_some(),
            skip_verify = http.no_verify,
            "Daemon running"
        );

        let mut status = tokio::time::interval(STATUS_INTERVAL);
        // The first tick completes immediately.
        status.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.notified() => {
                    info!("Stop request received, shutting down");
                    break;
                }
                _ = status.tick() => {
                    debug!("Daemon alive");
                }
            }
        }

        Ok(())
    }

    /// Request a cooperative stop.
    ///
    /// Safe to call from any task and safe to call more than once; a request
    /// made before [`Daemon::run`] is entered is not lost.
    pub fn stop(&self) {
        if !self.stop_requested.swap(true, Ordering::SeqCst) {
            info!("Daemon stop requested");
        }
        // notify_one stores a permit, so a pre-run stop still takes effect.
        self.shutdown.notify_one();
    }
}
