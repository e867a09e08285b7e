//! Filtered tree copying
//!
//! Walks the source tree with an explicit work list, prunes excluded
//! directories without descending into them, and copies surviving files
//! with permission bits and modification times preserved.
//!
//! The copy is staged: everything lands in a `.partial` directory beside
//! the final destination, which is renamed into place only after the walk
//! completes. A failed copy removes the staging directory, so a partial
//! snapshot is never visible under the final name.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{SnapkeepError, SnapkeepResult};
use crate::filter::{relative_path_str, ExclusionSet};

/// Suffix for the staging directory used during a copy.
pub const STAGING_SUFFIX: &str = ".partial";

/// Copy `source` into `destination`, omitting everything that matches the
/// exclusion set.
///
/// An excluded directory is pruned: nothing beneath it is visited, so no
/// descendant can leak into the destination even if the descendant itself
/// matches no pattern.
pub fn copy_tree(
    source: &Path,
    destination: &Path,
    exclusions: &ExclusionSet,
) -> SnapkeepResult<()> {
    let staging = staging_path(destination);
    if staging.exists() {
        // Leftover from an earlier aborted run.
        fs::remove_dir_all(&staging)
            .map_err(|e| SnapkeepError::Copy(format!("Failed to clear staging area: {}", e)))?;
    }

    match copy_into(source, &staging, exclusions) {
        Ok(()) => {
            fs::rename(&staging, destination).map_err(|e| {
                SnapkeepError::Copy(format!(
                    "Failed to move snapshot into place at {}: {}",
                    destination.display(),
                    e
                ))
            })?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_dir_all(&staging);
            Err(e)
        }
    }
}

/// Staging directory used while copying toward `destination`.
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    name.push_str(STAGING_SUFFIX);
    destination.with_file_name(name)
}

/// The walk itself: breadth-first over relative directory paths.
fn copy_into(source: &Path, dest: &Path, exclusions: &ExclusionSet) -> SnapkeepResult<()> {
    fs::create_dir_all(dest).map_err(|e| {
        SnapkeepError::Copy(format!(
            "Failed to create destination {}: {}",
            dest.display(),
            e
        ))
    })?;

    let mut pending: VecDeque<PathBuf> = VecDeque::new();
    pending.push_back(PathBuf::new());

    while let Some(rel_dir) = pending.pop_front() {
        let src_dir = source.join(&rel_dir);

        let entries = fs::read_dir(&src_dir).map_err(|e| {
            SnapkeepError::Copy(format!("Failed to read {}: {}", src_dir.display(), e))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                SnapkeepError::Copy(format!("Failed to read entry in {}: {}", src_dir.display(), e))
            })?;

            let rel = rel_dir.join(entry.file_name());
            if exclusions.matches(&relative_path_str(&rel)) {
                continue;
            }

            let file_type = entry.file_type().map_err(|e| {
                SnapkeepError::Copy(format!("Failed to stat {}: {}", entry.path().display(), e))
            })?;

            if file_type.is_dir() {
                let dst_dir = dest.join(&rel);
                fs::create_dir_all(&dst_dir).map_err(|e| {
                    SnapkeepError::Copy(format!(
                        "Failed to create {}: {}",
                        dst_dir.display(),
                        e
                    ))
                })?;
                pending.push_back(rel);
            } else if file_type.is_file() {
                copy_file(&entry.path(), &dest.join(&rel))?;
            } else if file_type.is_symlink() {
                // Symlinks to regular files are followed and copied as
                // their target's contents. Directory symlinks and broken
                // links are skipped; descending into them could loop.
                if let Ok(target) = fs::metadata(entry.path()) {
                    if target.is_file() {
                        copy_file(&entry.path(), &dest.join(&rel))?;
                    }
                }
            }
            // Other special files are skipped.
        }
    }

    Ok(())
}

/// Copy a single file, preserving permission bits and mtime.
fn copy_file(src: &Path, dst: &Path) -> SnapkeepResult<()> {
    fs::copy(src, dst).map_err(|e| {
        SnapkeepError::Copy(format!(
            "Failed to copy {} to {}: {}",
            src.display(),
            dst.display(),
            e
        ))
    })?;

    let metadata = fs::metadata(src)
        .map_err(|e| SnapkeepError::Copy(format!("Failed to stat {}: {}", src.display(), e)))?;
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(dst, mtime).map_err(|e| {
        SnapkeepError::Copy(format!(
            "Failed to set mtime on {}: {}",
            dst.display(),
            e
        ))
    })?;

    Ok(())
}
