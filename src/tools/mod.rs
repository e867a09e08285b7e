//! External tool collaborators
//!
//! The snapshot engine shells out for two things: recursive disk usage and
//! version-control state. Both sit behind narrow traits so tests can inject
//! fakes instead of invoking real host tools, and both go through a bounded
//! process runner so a hung tool cannot hang the run.

pub mod disk;
pub mod process;
pub mod vcs;

pub use disk::{DiskUsage, DuProbe};
pub use vcs::{GitCli, Vcs};
