//! Configuration module for the shellgate daemon.
//!
//! Handles loading the daemon configuration from layered JSON files and
//! validating the merged result.

mod settings;

pub use settings::*;
