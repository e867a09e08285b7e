//! Post-copy integrity verification
//!
//! A presence-only smoke test: the fixed list of key files and directories
//! that exist in the source must also exist in the snapshot. Content is
//! never compared. Items absent from the source are ignored.

use std::path::Path;

/// Outcome of an integrity check.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    /// Key items present in both source and snapshot
    pub present: Vec<String>,
    /// Key items present in the source but missing from the snapshot
    pub missing: Vec<String>,
}

impl VerificationReport {
    /// Whether every key item that exists in the source survived the copy.
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check that key files and directories survived the copy.
pub fn verify(
    source: &Path,
    destination: &Path,
    key_files: &[String],
    key_dirs: &[String],
) -> VerificationReport {
    let mut report = VerificationReport::default();

    for name in key_files {
        check_item(source, destination, name, name.clone(), &mut report);
    }

    for name in key_dirs {
        check_item(source, destination, name, format!("{}/", name), &mut report);
    }

    report
}

fn check_item(
    source: &Path,
    destination: &Path,
    name: &str,
    label: String,
    report: &mut VerificationReport,
) {
    if !source.join(name).exists() {
        return;
    }

    if destination.join(name).exists() {
        report.present.push(label);
    } else {
        report.missing.push(label);
    }
}
