//! Error types for the shellgate daemon.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
