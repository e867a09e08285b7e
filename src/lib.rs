//! snapkeep - filtered project snapshot tool
//!
//! This library implements the snapshot engine behind the `snapkeep`
//! binary: it walks a project directory, excludes paths matching a
//! configurable pattern set, copies the remainder into a timestamped
//! sibling destination, verifies the result, records provenance metadata,
//! and enforces a retention policy over prior snapshots.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Project settings (exclusion patterns, retention policy)
//! - `error`: Custom error types
//! - `filter`: Compiled exclusion pattern matching
//! - `snapshot`: The engine (copier, verifier, metadata, retention,
//!   orchestration)
//! - `tools`: External collaborators (`du`, `git`) behind injectable traits
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use snapkeep::config::Settings;
//! use snapkeep::snapshot::SnapshotManager;
//!
//! let settings = Settings::load_or_default(&project_root)?;
//! let manager = SnapshotManager::new(&project_root, settings)?;
//! let outcome = manager.create_snapshot()?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod snapshot;
pub mod tools;

pub use error::SnapkeepError;
