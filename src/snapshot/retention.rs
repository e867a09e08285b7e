//! Snapshot retention
//!
//! Enumerates prior snapshots of a project (sibling directories named
//! `<project>_backup_<YYYYMMDD_HHMMSS>`) and deletes the oldest beyond the
//! retention limit.
//!
//! The snapshot just created is excluded from the count before comparing
//! against the limit, so a run that triggers cleanup leaves `limit + 1`
//! live snapshots: the `limit` most recent prior ones plus the new one.
//! That matches the observed behavior this tool replaces.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDateTime;

use crate::error::{SnapkeepError, SnapkeepResult};
use crate::snapshot::copier::STAGING_SUFFIX;

/// Timestamp format embedded in snapshot directory names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Metadata about one existing snapshot directory.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    /// Directory name (`<project>_backup_<timestamp>`)
    pub name: String,
    /// Full path to the snapshot
    pub path: PathBuf,
    /// Creation time parsed out of the directory name, if well-formed
    pub created_at: Option<NaiveDateTime>,
    /// Filesystem modification time, used for retention ordering
    pub modified: SystemTime,
}

/// Enumerates and prunes snapshots for one project.
pub struct RetentionManager {
    /// Directory holding the snapshots (parent of the project root)
    base_dir: PathBuf,
    /// `<project>_backup_` naming prefix
    prefix: String,
}

impl RetentionManager {
    /// Create a retention manager for snapshots of `project_name` stored in
    /// `base_dir`.
    pub fn new(base_dir: PathBuf, project_name: &str) -> Self {
        Self {
            base_dir,
            prefix: format!("{}_backup_", project_name),
        }
    }

    /// List all snapshots for this project, newest first by modification
    /// time. Staging leftovers (`.partial`) are skipped.
    pub fn list_snapshots(&self) -> SnapkeepResult<Vec<SnapshotInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();

        let entries = fs::read_dir(&self.base_dir)
            .map_err(|e| SnapkeepError::Io(format!("Failed to read {}: {}", self.base_dir.display(), e)))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| SnapkeepError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }
            if let Some(info) = self.parse_snapshot_info(&path) {
                snapshots.push(info);
            }
        }

        snapshots.sort_by(|a, b| b.modified.cmp(&a.modified));

        Ok(snapshots)
    }

    /// Parse snapshot info from a directory path, if it follows the naming
    /// convention.
    fn parse_snapshot_info(&self, path: &Path) -> Option<SnapshotInfo> {
        let name = path.file_name()?.to_string_lossy().to_string();

        if !name.starts_with(&self.prefix) || name.ends_with(STAGING_SUFFIX) {
            return None;
        }

        let timestamp_part = name.strip_prefix(&self.prefix)?;
        let created_at = NaiveDateTime::parse_from_str(timestamp_part, TIMESTAMP_FORMAT).ok();

        let modified = fs::metadata(path).ok()?.modified().ok()?;

        Some(SnapshotInfo {
            name,
            path: path.to_path_buf(),
            created_at,
            modified,
        })
    }

    /// Delete prior snapshots beyond `limit`, keeping the `limit` most
    /// recently modified ones. The snapshot named `just_created` is never
    /// counted or deleted. Staging directories orphaned by crashed runs
    /// are swept as well.
    ///
    /// Returns the paths that were deleted. A deletion failure is fatal for
    /// the run.
    pub fn enforce(&self, just_created: &str, limit: usize) -> SnapkeepResult<Vec<PathBuf>> {
        let prior: Vec<SnapshotInfo> = self
            .list_snapshots()?
            .into_iter()
            .filter(|s| s.name != just_created)
            .collect();

        let mut deleted = self.sweep_stale_staging()?;

        for stale in prior.into_iter().skip(limit) {
            fs::remove_dir_all(&stale.path).map_err(|e| {
                SnapkeepError::Retention(format!(
                    "Failed to delete old snapshot {}: {}",
                    stale.path.display(),
                    e
                ))
            })?;
            deleted.push(stale.path);
        }

        Ok(deleted)
    }

    /// Remove `<project>_backup_*.partial` leftovers from runs that died
    /// mid-copy. The active run has already renamed its own staging
    /// directory away by the time retention runs.
    fn sweep_stale_staging(&self) -> SnapkeepResult<Vec<PathBuf>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut removed = Vec::new();

        let entries = fs::read_dir(&self.base_dir)
            .map_err(|e| SnapkeepError::Io(format!("Failed to read {}: {}", self.base_dir.display(), e)))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| SnapkeepError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if path.is_dir() && name.starts_with(&self.prefix) && name.ends_with(STAGING_SUFFIX) {
                fs::remove_dir_all(&path).map_err(|e| {
                    SnapkeepError::Retention(format!(
                        "Failed to delete stale staging directory {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                removed.push(path);
            }
        }

        Ok(removed)
    }
}
