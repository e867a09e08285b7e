//! Snapshot orchestration
//!
//! `SnapshotManager` owns the project root, the compiled exclusion set, and
//! the external collaborators, and sequences a run: precondition check,
//! staged copy, size measurement, integrity verification, provenance
//! write, retention cleanup. Execution is strictly sequential.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::Settings;
use crate::error::{SnapkeepError, SnapkeepResult};
use crate::filter::ExclusionSet;
use crate::snapshot::copier::copy_tree;
use crate::snapshot::metadata::{self, Provenance};
use crate::snapshot::retention::{RetentionManager, TIMESTAMP_FORMAT};
use crate::snapshot::verify::{self, VerificationReport};
use crate::tools::{DiskUsage, DuProbe, GitCli, Vcs};

/// Result of a completed snapshot run.
#[derive(Debug)]
pub struct SnapshotOutcome {
    /// Where the snapshot landed
    pub path: PathBuf,
    /// Measured size of the snapshot (0 if the probe degraded)
    pub size_mb: u64,
    /// Path of the written provenance file
    pub info_file: PathBuf,
    /// Integrity check result; the snapshot is kept even when this failed
    pub verification: VerificationReport,
    /// Stale snapshots removed by retention cleanup
    pub deleted: Vec<PathBuf>,
}

/// Sequences the snapshot components for one project.
pub struct SnapshotManager {
    project_root: PathBuf,
    project_name: String,
    /// Parent of the project root; snapshots are created here
    base_dir: PathBuf,
    settings: Settings,
    exclusions: ExclusionSet,
    disk: Box<dyn DiskUsage>,
    vcs: Box<dyn Vcs>,
}

impl SnapshotManager {
    /// Create a manager with the real host collaborators (`du`, `git`).
    pub fn new(project_root: &Path, settings: Settings) -> SnapkeepResult<Self> {
        Self::with_collaborators(project_root, settings, Box::new(DuProbe), Box::new(GitCli))
    }

    /// Create a manager with injected collaborators (for tests).
    pub fn with_collaborators(
        project_root: &Path,
        settings: Settings,
        disk: Box<dyn DiskUsage>,
        vcs: Box<dyn Vcs>,
    ) -> SnapkeepResult<Self> {
        let project_root = project_root
            .canonicalize()
            .map_err(|e| SnapkeepError::Config(format!("Invalid project root: {}", e)))?;

        let project_name = project_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| SnapkeepError::Config("Project root has no name".into()))?;

        let base_dir = project_root
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| SnapkeepError::Config("Project root has no parent directory".into()))?;

        let exclusions = ExclusionSet::compile(&settings.exclude)?;

        Ok(Self {
            project_root,
            project_name,
            base_dir,
            settings,
            exclusions,
            disk,
            vcs,
        })
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Abort before any filesystem mutation if the marker file is missing.
    pub fn check_precondition(&self) -> SnapkeepResult<()> {
        let marker = self.project_root.join(&self.settings.marker_file);
        if !marker.exists() {
            return Err(SnapkeepError::marker_missing(&self.settings.marker_file));
        }
        Ok(())
    }

    /// Destination path for a snapshot taken now. One-second granularity;
    /// two runs completing within the same second would collide.
    pub fn next_snapshot_path(&self) -> PathBuf {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        self.base_dir
            .join(format!("{}_backup_{}", self.project_name, timestamp))
    }

    /// Estimated size of the source tree, best-effort.
    pub fn estimate_size_mb(&self) -> u64 {
        self.disk.usage_mb(&self.project_root)
    }

    /// Measure an arbitrary directory through the injected probe,
    /// best-effort.
    pub fn measure_mb(&self, path: &Path) -> u64 {
        self.disk.usage_mb(path)
    }

    /// Retention manager for this project's snapshot set.
    pub fn retention(&self) -> RetentionManager {
        RetentionManager::new(self.base_dir.clone(), &self.project_name)
    }

    /// Run the full sequence: copy, measure, verify, record, prune.
    ///
    /// The returned outcome carries a verification report rather than an
    /// error: a failed integrity check keeps the snapshot and is surfaced
    /// as a degraded result by the caller.
    pub fn create_snapshot(&self) -> SnapkeepResult<SnapshotOutcome> {
        let destination = self.next_snapshot_path();
        self.create_snapshot_to(&destination)
    }

    /// Like [`create_snapshot`](Self::create_snapshot), but with a caller
    /// supplied destination, so the path can be shown (and confirmed)
    /// before anything is written.
    pub fn create_snapshot_to(&self, destination: &Path) -> SnapkeepResult<SnapshotOutcome> {
        self.check_precondition()?;

        let snapshot_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Provenance reflects the source at the instant the copy begins.
        let provenance = Provenance::capture(&self.project_root, self.vcs.as_ref());

        copy_tree(&self.project_root, destination, &self.exclusions)?;

        let size_mb = self.disk.usage_mb(destination);

        let verification = verify::verify(
            &self.project_root,
            destination,
            &self.settings.key_files,
            &self.settings.key_dirs,
        );

        let info_file = metadata::write_info(
            destination,
            &self.project_root,
            size_mb,
            &self.exclusions.sources(),
            &provenance,
        )?;

        let deleted = self
            .retention()
            .enforce(&snapshot_name, self.settings.retention_limit)?;

        Ok(SnapshotOutcome {
            path: destination.to_path_buf(),
            size_mb,
            info_file,
            verification,
            deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct FakeDisk(u64);

    impl DiskUsage for FakeDisk {
        fn usage_mb(&self, _path: &Path) -> u64 {
            self.0
        }
    }

    struct FakeVcs;

    impl Vcs for FakeVcs {
        fn status_summary(&self, _root: &Path) -> String {
            "Clean working directory".to_string()
        }

        fn revision(&self, _root: &Path) -> String {
            "deadbeef".to_string()
        }
    }

    fn project_settings() -> Settings {
        Settings {
            exclude: vec!["node_modules".into(), "*.log".into()],
            retention_limit: 2,
            key_files: vec!["package.json".into()],
            key_dirs: vec!["src".into()],
            marker_file: "package.json".into(),
            ..Settings::default()
        }
    }

    fn make_project(base: &Path) -> PathBuf {
        let root = base.join("proj");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/dep")).unwrap();
        fs::write(root.join("package.json"), r#"{"name":"proj","version":"1.0.0"}"#).unwrap();
        fs::write(root.join("src/index.ts"), "export {}").unwrap();
        fs::write(root.join("debug.log"), "noise").unwrap();
        fs::write(root.join("node_modules/dep/index.js"), "junk").unwrap();
        root
    }

    fn make_manager(root: &Path) -> SnapshotManager {
        SnapshotManager::with_collaborators(
            root,
            project_settings(),
            Box::new(FakeDisk(7)),
            Box::new(FakeVcs),
        )
        .unwrap()
    }

    #[test]
    fn test_precondition_rejects_missing_marker() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("bare");
        fs::create_dir_all(&root).unwrap();

        let manager = make_manager(&root);
        let err = manager.check_precondition().unwrap_err();
        assert!(err.is_precondition());

        // Nothing was mutated.
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_create_snapshot_full_run() {
        let temp = TempDir::new().unwrap();
        let root = make_project(temp.path());

        let outcome = make_manager(&root).create_snapshot().unwrap();

        assert!(outcome.path.exists());
        assert!(outcome.path.join("src/index.ts").exists());
        assert!(!outcome.path.join("node_modules").exists());
        assert!(!outcome.path.join("debug.log").exists());
        assert_eq!(outcome.size_mb, 7);
        assert!(outcome.verification.passed());
        assert!(outcome.deleted.is_empty());

        let info = fs::read_to_string(&outcome.info_file).unwrap();
        assert!(info.contains("Backup Size: 7MB"));
        assert!(info.contains("deadbeef"));
        assert!(info.contains("Name: proj, Version: 1.0.0"));
    }

    #[test]
    fn test_snapshot_lands_beside_project() {
        let temp = TempDir::new().unwrap();
        let root = make_project(temp.path());

        let outcome = make_manager(&root).create_snapshot().unwrap();

        assert_eq!(outcome.path.parent().unwrap(), root.parent().unwrap());
        let name = outcome.path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("proj_backup_"));
    }

    #[test]
    fn test_retention_runs_as_part_of_create() {
        let temp = TempDir::new().unwrap();
        let root = make_project(temp.path());

        // Pre-seed more prior snapshots than the limit allows.
        for i in 0..4 {
            let stale = temp.path().join(format!("proj_backup_2024010{}_000000", i));
            fs::create_dir_all(&stale).unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }

        let outcome = make_manager(&root).create_snapshot().unwrap();

        // limit = 2: 4 prior snapshots, 2 deleted, new one untouched.
        assert_eq!(outcome.deleted.len(), 2);
        assert!(outcome.path.exists());

        let manager = make_manager(&root);
        let live = manager.retention().list_snapshots().unwrap();
        assert_eq!(live.len(), 3); // limit + 1
    }

    #[test]
    fn test_measurement_goes_through_injected_probe() {
        let temp = TempDir::new().unwrap();
        let root = make_project(temp.path());

        let manager = make_manager(&root);
        assert_eq!(manager.measure_mb(temp.path()), 7);
        assert_eq!(manager.estimate_size_mb(), 7);
    }

    #[test]
    fn test_degraded_probe_still_succeeds() {
        let temp = TempDir::new().unwrap();
        let root = make_project(temp.path());

        let manager = SnapshotManager::with_collaborators(
            &root,
            project_settings(),
            Box::new(FakeDisk(0)),
            Box::new(FakeVcs),
        )
        .unwrap();

        let outcome = manager.create_snapshot().unwrap();
        assert_eq!(outcome.size_mb, 0);
        // Verification still ran and passed.
        assert!(outcome.verification.passed());
    }

    #[test]
    fn test_invalid_root_is_config_error() {
        let temp = TempDir::new().unwrap();
        let result = SnapshotManager::with_collaborators(
            &temp.path().join("does-not-exist"),
            project_settings(),
            Box::new(FakeDisk(0)),
            Box::new(FakeVcs),
        );
        assert!(matches!(result, Err(SnapkeepError::Config(_))));
    }
}
