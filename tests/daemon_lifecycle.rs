//! Integration tests for the supervised daemon lifecycle.
//!
//! These tests run a real supervisor and verify that the termination signal
//! and the cooperative stop both unblock the run loop within bounded time.

use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::{raise, Signal};

use shellgate::config::Config;
use shellgate::daemon::Supervisor;

/// A minimal validated configuration pointing at a single server.
fn validated_config() -> Config {
    let mut config = Config {
        client_protocol: "https".to_string(),
        server_url: "https://device.example.com/".to_string(),
        shell_command: "/bin/sh".to_string(),
        user: "device".to_string(),
        ..Config::default()
    };
    config.validate().expect("Failed to validate test configuration");
    config
}

#[tokio::test]
async fn test_sigterm_stops_the_supervised_daemon() {
    let supervisor = Arc::new(Supervisor::new(validated_config()));
    let daemon = supervisor.daemon();

    let runner = Arc::clone(&supervisor);
    let handle = tokio::spawn(async move { runner.run().await });

    // Let the run loop start and the signal subscription be taken.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!daemon.stop_requested());

    raise(Signal::SIGTERM).expect("Failed to raise SIGTERM");

    let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("Run loop should return within bounded time after SIGTERM")
        .expect("Supervisor task should not panic");

    assert!(outcome.is_ok());
    assert!(daemon.stop_requested());
}

#[tokio::test]
async fn test_direct_stop_unblocks_the_run_loop() {
    let supervisor = Arc::new(Supervisor::new(validated_config()));
    let daemon = supervisor.daemon();

    let runner = Arc::clone(&supervisor);
    let handle = tokio::spawn(async move { runner.run().await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    daemon.stop();

    let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("Run loop should return within bounded time after stop")
        .expect("Supervisor task should not panic");

    assert!(outcome.is_ok());
}
