//! The filtered snapshot engine
//!
//! Components, leaves first: [`copier`] walks and copies the filtered tree,
//! [`verify`] smoke-tests the result, [`metadata`] records provenance,
//! [`retention`] prunes stale snapshots, and [`manager`] sequences them.

pub mod copier;
pub mod manager;
pub mod metadata;
pub mod retention;
pub mod verify;

pub use manager::{SnapshotManager, SnapshotOutcome};
pub use metadata::Provenance;
pub use retention::{RetentionManager, SnapshotInfo};
pub use verify::VerificationReport;
