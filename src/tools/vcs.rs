//! Version-control state queries
//!
//! Provenance capture asks the VCS two questions: is the working tree
//! clean, and what revision is checked out. Absence of a repository is not
//! an error; both queries degrade to sentinel text.

use std::path::Path;
use std::time::Duration;

use super::process::run_command;

/// How long a VCS query may run before being killed.
const VCS_TIMEOUT: Duration = Duration::from_secs(30);

/// Sentinel when the project root is not under version control.
pub const NOT_A_REPOSITORY: &str = "Not a git repository";
/// Sentinel when no revision can be resolved.
pub const NO_COMMIT_FOUND: &str = "No git commit found";
/// Status summary for a clean working tree.
pub const CLEAN_WORKING_TREE: &str = "Clean working directory";

/// Queries version-control state of a project root.
pub trait Vcs {
    /// Working-tree status: a porcelain summary, [`CLEAN_WORKING_TREE`] if
    /// nothing is modified, or [`NOT_A_REPOSITORY`] on failure.
    fn status_summary(&self, root: &Path) -> String;

    /// Current revision id, or [`NO_COMMIT_FOUND`] on failure.
    fn revision(&self, root: &Path) -> String;
}

/// Real implementation backed by the `git` CLI.
#[derive(Debug, Default)]
pub struct GitCli;

impl Vcs for GitCli {
    fn status_summary(&self, root: &Path) -> String {
        match run_command("git", &["status", "--porcelain"], root, VCS_TIMEOUT) {
            Ok(out) if out.success => {
                let status = out.stdout.trim();
                if status.is_empty() {
                    CLEAN_WORKING_TREE.to_string()
                } else {
                    status.to_string()
                }
            }
            _ => NOT_A_REPOSITORY.to_string(),
        }
    }

    fn revision(&self, root: &Path) -> String {
        match run_command("git", &["rev-parse", "HEAD"], root, VCS_TIMEOUT) {
            Ok(out) if out.success => {
                let rev = out.stdout.trim();
                if rev.is_empty() {
                    NO_COMMIT_FOUND.to_string()
                } else {
                    rev.to_string()
                }
            }
            _ => NO_COMMIT_FOUND.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_non_repository_degrades_to_sentinels() {
        let temp = TempDir::new().unwrap();
        let git = GitCli;

        assert_eq!(git.status_summary(temp.path()), NOT_A_REPOSITORY);
        assert_eq!(git.revision(temp.path()), NO_COMMIT_FOUND);
    }
}
