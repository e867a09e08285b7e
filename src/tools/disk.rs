//! Recursive disk usage probe
//!
//! Wraps the host `du` utility. Measurement is best-effort by contract:
//! every failure mode (missing tool, non-zero exit, unparseable output,
//! timeout) degrades to a reported size of zero so a broken probe never
//! blocks a snapshot.

use std::path::Path;
use std::time::Duration;

use super::process::run_command;

/// How long a disk usage query may run before being killed.
const DU_TIMEOUT: Duration = Duration::from_secs(60);

/// Reports the recursive on-disk size of a directory in megabytes.
pub trait DiskUsage {
    /// Measure `path`, returning 0 on any failure.
    fn usage_mb(&self, path: &Path) -> u64;
}

/// Real probe backed by `du -sk`.
#[derive(Debug, Default)]
pub struct DuProbe;

impl DiskUsage for DuProbe {
    fn usage_mb(&self, path: &Path) -> u64 {
        let cwd = path.parent().unwrap_or(path);
        let target = path.to_string_lossy();

        let output = match run_command("du", &["-sk", target.as_ref()], cwd, DU_TIMEOUT) {
            Ok(out) if out.success => out,
            _ => return 0,
        };

        parse_du_kb(&output.stdout).map_or(0, |kb| kb / 1024)
    }
}

/// Parse the kilobyte count from `du -sk` output (`"<kb>\t<path>"`).
fn parse_du_kb(stdout: &str) -> Option<u64> {
    stdout.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_du_output() {
        assert_eq!(parse_du_kb("2048\t/some/path\n"), Some(2048));
        assert_eq!(parse_du_kb("12 /other"), Some(12));
        assert_eq!(parse_du_kb(""), None);
        assert_eq!(parse_du_kb("garbage output"), None);
    }

    #[test]
    fn test_missing_directory_degrades_to_zero() {
        let probe = DuProbe;
        assert_eq!(probe.usage_mb(Path::new("/no/such/directory/anywhere")), 0);
    }

    #[test]
    fn test_small_directory_floors_to_zero_mb() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tiny.txt"), "hello").unwrap();

        let probe = DuProbe;
        // A few bytes is well under a megabyte; floor division yields 0.
        assert_eq!(probe.usage_mb(temp.path()), 0);
    }
}
