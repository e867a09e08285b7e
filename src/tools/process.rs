//! Bounded external command execution
//!
//! Spawns a command, polls for completion against a deadline, and kills the
//! child on timeout. Output is captured, never inherited.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub success: bool,
}

/// Why a command did not produce usable output.
#[derive(Debug)]
pub enum ToolError {
    /// The program could not be spawned (missing binary, permissions)
    Spawn(std::io::Error),
    /// The command ran past the deadline and was killed
    TimedOut,
    /// Reading or waiting on the child failed
    Io(std::io::Error),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "failed to spawn: {}", e),
            Self::TimedOut => write!(f, "timed out"),
            Self::Io(e) => write!(f, "i/o failure: {}", e),
        }
    }
}

/// How long to wait between completion polls.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Run a command with captured stdout, enforcing a wall-clock timeout.
///
/// On timeout the child is killed and reaped before returning.
///
/// Stdout is drained only after the child exits, so this is suitable for
/// commands with small output (a status line, a revision id), not for
/// commands that can fill the pipe buffer.
pub fn run_command(
    program: &str,
    args: &[&str],
    cwd: &Path,
    timeout: Duration,
) -> Result<CommandOutput, ToolError> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(ToolError::Spawn)?;

    let deadline = Instant::now() + timeout;

    loop {
        match child.try_wait().map_err(ToolError::Io)? {
            Some(status) => {
                let mut stdout = String::new();
                if let Some(mut out) = child.stdout.take() {
                    out.read_to_string(&mut stdout).map_err(ToolError::Io)?;
                }
                return Ok(CommandOutput {
                    stdout,
                    success: status.success(),
                });
            }
            None => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ToolError::TimedOut);
                }
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_captures_stdout() {
        let temp = TempDir::new().unwrap();
        let out = run_command("echo", &["hello"], temp.path(), Duration::from_secs(5)).unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_nonzero_exit_is_not_success() {
        let temp = TempDir::new().unwrap();
        let out = run_command("false", &[], temp.path(), Duration::from_secs(5)).unwrap();
        assert!(!out.success);
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let temp = TempDir::new().unwrap();
        let err = run_command(
            "definitely-not-a-real-binary",
            &[],
            temp.path(),
            Duration::from_secs(5),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::Spawn(_)));
    }

    #[test]
    fn test_timeout_kills_child() {
        let temp = TempDir::new().unwrap();
        let start = Instant::now();
        let err = run_command("sleep", &["30"], temp.path(), Duration::from_millis(200))
            .unwrap_err();
        assert!(matches!(err, ToolError::TimedOut));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
