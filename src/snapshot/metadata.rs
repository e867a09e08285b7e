//! Provenance capture and the snapshot info file
//!
//! Provenance is captured from the *source* project before the copy starts:
//! version-control status and revision (sentinel text when there is no
//! repository) and the package manifest name/version (sentinel when absent
//! or unparsable). After the copy, the record is written as a fixed-layout
//! text file inside the snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{SnapkeepError, SnapkeepResult};
use crate::tools::Vcs;

/// Name of the provenance file written into each snapshot.
pub const INFO_FILE: &str = "BACKUP_INFO.txt";

/// Sentinel when the project has no readable package manifest.
pub const NO_MANIFEST: &str = "No package.json found";

/// Version-control and manifest state of the source project at the moment
/// the copy began.
#[derive(Debug, Clone)]
pub struct Provenance {
    /// When capture happened
    pub captured_at: DateTime<Local>,
    /// Working-tree status summary
    pub vcs_status: String,
    /// Revision id
    pub vcs_revision: String,
    /// `Name: <n>, Version: <v>` or a sentinel
    pub manifest_summary: String,
}

impl Provenance {
    /// Capture provenance from the project root.
    pub fn capture(root: &Path, vcs: &dyn Vcs) -> Self {
        Self {
            captured_at: Local::now(),
            vcs_status: vcs.status_summary(root),
            vcs_revision: vcs.revision(root),
            manifest_summary: manifest_summary(root),
        }
    }
}

/// Read `package.json` name and version, degrading to a sentinel.
fn manifest_summary(root: &Path) -> String {
    let manifest = root.join("package.json");
    if !manifest.exists() {
        return NO_MANIFEST.to_string();
    }

    let parsed: serde_json::Value = match fs::read_to_string(&manifest)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
    {
        Some(value) => value,
        None => return NO_MANIFEST.to_string(),
    };

    let name = parsed
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown");
    let version = parsed
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown");

    format!("Name: {}, Version: {}", name, version)
}

/// Write the provenance record into the snapshot directory.
///
/// Returns the path of the written file.
pub fn write_info(
    snapshot_path: &Path,
    source_path: &Path,
    size_mb: u64,
    excluded_patterns: &[&str],
    provenance: &Provenance,
) -> SnapkeepResult<PathBuf> {
    let info_path = snapshot_path.join(INFO_FILE);

    let pattern_list = excluded_patterns
        .iter()
        .map(|p| format!("- {}", p))
        .collect::<Vec<_>>()
        .join("\n");

    let contents = format!(
        "Project Snapshot\n\
         ================\n\
         \n\
         Backup Created: {}\n\
         Original Path: {}\n\
         Backup Path: {}\n\
         Backup Size: {}MB\n\
         \n\
         Excluded Patterns:\n\
         {}\n\
         \n\
         Git Status at Backup:\n\
         {}\n\
         \n\
         Git Commit at Backup:\n\
         {}\n\
         \n\
         Package.json Info:\n\
         {}\n",
        provenance.captured_at.format("%Y-%m-%d %H:%M:%S"),
        source_path.display(),
        snapshot_path.display(),
        size_mb,
        pattern_list,
        provenance.vcs_status,
        provenance.vcs_revision,
        provenance.manifest_summary,
    );

    fs::write(&info_path, contents)
        .map_err(|e| SnapkeepError::Io(format!("Failed to write snapshot info: {}", e)))?;

    Ok(info_path)
}
