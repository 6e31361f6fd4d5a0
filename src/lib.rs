//! Shellgate Daemon Library
//!
//! This crate provides the core functionality for the shellgate daemon, a
//! device-side agent that maintains a remote shell session against a
//! configured server. It covers layered configuration loading and validation
//! and the signal-driven daemon lifecycle.

pub mod config;
pub mod daemon;
pub mod error;
pub mod https;
