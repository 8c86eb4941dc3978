//! ofcurve-cli library root.
//!
//! Re-exports internal modules so integration tests can exercise the
//! settings store and command output without spawning the binary.

pub mod commands;
pub mod config;
