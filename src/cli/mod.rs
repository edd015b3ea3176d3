//! Command-line interface
//!
//! Argument parsing for the `chain-testnet` binary and the logging
//! application its `start` command runs.

pub mod app;
pub mod commands;

pub use app::LoggingAppFactory;
pub use commands::{Command, Opt};
