//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the snapshot engine.

pub mod snapshot;

pub use snapshot::{handle_snapshot_command, RunStatus, SnapshotCommands};
