//! Error types for the shellgate daemon.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the daemon.
#[derive(Error, Debug)]
pub enum DaemonError {
    /// Configuration-related errors.
    #[error("Configuration error: {kind}")]
    Config { kind: ConfigErrorKind },

    /// Daemon run loop errors.
    #[error("Daemon error: {message}")]
    Daemon { message: String },
}

/// Configuration error kinds.
///
/// Operators need different remediation for a bad file on disk versus
/// contradictory fields, so the kinds keep them apart.
#[derive(Error, Debug)]
pub enum ConfigErrorKind {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON syntax error in config file '{path}': {message}")]
    Syntax { path: PathBuf, message: String },

    #[error("Failed to decode config file '{path}': {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Both Servers and ServerURL given in configuration")]
    ServerConflict,
}

impl DaemonError {
    /// Wrap a configuration error kind.
    pub fn config(kind: ConfigErrorKind) -> Self {
        Self::Config { kind }
    }
}
