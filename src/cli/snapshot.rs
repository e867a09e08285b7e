//! Snapshot CLI commands
//!
//! Implements the create/list/prune commands. Each stage prints a
//! human-readable status line; the process exit code is the only
//! machine-readable success signal.

use std::io::{self, Write};
use std::path::Path;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::SnapkeepResult;
use crate::snapshot::SnapshotManager;

/// Snapshot subcommands
#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Create a new filtered snapshot of the project
    Create {
        /// Prompt for confirmation before writing anything
        #[arg(short, long)]
        interactive: bool,
    },

    /// List existing snapshots for this project
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete stale snapshots according to the retention policy
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// How a command run ended, for exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Everything the command attempted succeeded
    Success,
    /// The user declined an interactive confirmation; nothing was mutated
    Cancelled,
    /// The snapshot exists but the integrity check reported missing items
    Degraded,
}

/// Handle a snapshot command
pub fn handle_snapshot_command(
    project_root: &Path,
    cmd: SnapshotCommands,
) -> SnapkeepResult<RunStatus> {
    let settings = Settings::load_or_default(project_root)?;
    let manager = SnapshotManager::new(project_root, settings)?;

    match cmd {
        SnapshotCommands::Create { interactive } => create(&manager, interactive),
        SnapshotCommands::List { verbose } => {
            list(&manager, verbose)?;
            Ok(RunStatus::Success)
        }
        SnapshotCommands::Prune { force } => prune(&manager, force),
    }
}

fn create(manager: &SnapshotManager, interactive: bool) -> SnapkeepResult<RunStatus> {
    println!("Project Snapshot");
    println!("================");

    manager.check_precondition()?;

    let destination = manager.next_snapshot_path();

    println!("Project: {}", manager.project_name());
    println!("Destination: {}", destination.display());
    println!();

    println!("Excluding the following patterns:");
    for pattern in manager.exclusions().sources() {
        println!("  - {}", pattern);
    }
    println!();

    println!("Calculating snapshot size...");
    let estimated = manager.estimate_size_mb();
    println!("Estimated snapshot size: ~{}MB", estimated);
    println!();

    if interactive {
        let answer = prompt(&format!(
            "Create snapshot at {}? (Y/n): ",
            destination.display()
        ))?;
        if matches!(answer.to_lowercase().as_str(), "n" | "no") {
            println!("Snapshot cancelled");
            return Ok(RunStatus::Cancelled);
        }
    }

    println!("Creating snapshot...");
    let outcome = manager.create_snapshot_to(&destination)?;

    println!();
    println!("Snapshot created successfully!");
    println!("Location: {}", outcome.path.display());
    println!("Size: {}MB", outcome.size_mb);
    println!("Info saved to: {}", outcome.info_file.display());

    println!();
    println!("Verifying snapshot integrity...");
    for item in &outcome.verification.present {
        println!("  ok      {}", item);
    }
    for item in &outcome.verification.missing {
        println!("  MISSING {}", item);
    }

    println!();
    println!("Managing snapshot retention...");
    if outcome.deleted.is_empty() {
        println!(
            "Snapshot count within retention limit ({})",
            manager.settings().retention_limit
        );
    } else {
        for path in &outcome.deleted {
            println!(
                "Removed old snapshot: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
        }
    }

    if outcome.verification.passed() {
        println!();
        println!("Snapshot completed successfully!");
        Ok(RunStatus::Success)
    } else {
        println!();
        println!("Warning: snapshot created but integrity check failed");
        Ok(RunStatus::Degraded)
    }
}

fn list(manager: &SnapshotManager, verbose: bool) -> SnapkeepResult<()> {
    let snapshots = manager.retention().list_snapshots()?;

    if snapshots.is_empty() {
        println!("No snapshots found for {}.", manager.project_name());
        println!("Create one with: snapkeep create");
        return Ok(());
    }

    println!("Available snapshots for {}", manager.project_name());
    println!("==================================");

    for (i, snapshot) in snapshots.iter().enumerate() {
        let created = snapshot
            .created_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown date".to_string());

        if verbose {
            println!(
                "{}. {}\n   Created: {}\n   Size: {}MB\n",
                i + 1,
                snapshot.name,
                created,
                manager.measure_mb(&snapshot.path),
            );
        } else {
            println!("  {}. {} ({})", i + 1, snapshot.name, created);
        }
    }

    println!();
    println!("Total: {} snapshot(s)", snapshots.len());
    Ok(())
}

fn prune(manager: &SnapshotManager, force: bool) -> SnapkeepResult<RunStatus> {
    let snapshots = manager.retention().list_snapshots()?;
    let limit = manager.settings().retention_limit;
    let to_delete = snapshots.len().saturating_sub(limit);

    if to_delete == 0 {
        println!(
            "Snapshot count ({}) within retention limit ({})",
            snapshots.len(),
            limit
        );
        return Ok(RunStatus::Success);
    }

    println!("Prune Summary");
    println!("=============");
    println!("Retention limit: {}", limit);
    println!("Current snapshots: {}", snapshots.len());
    println!("To be deleted: {}", to_delete);
    println!();

    if !force {
        println!("To delete old snapshots, run again with --force flag:");
        println!("  snapkeep prune --force");
        return Ok(RunStatus::Cancelled);
    }

    // No snapshot is being created here, so nothing is exempt.
    let deleted = manager.retention().enforce("", limit)?;
    println!("Deleted {} snapshot(s).", deleted.len());
    Ok(RunStatus::Success)
}

/// Prompt for a line of input
fn prompt(message: &str) -> SnapkeepResult<String> {
    print!("{}", message);
    io::stdout()
        .flush()
        .map_err(|e| crate::error::SnapkeepError::Io(e.to_string()))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| crate::error::SnapkeepError::Io(e.to_string()))?;

    Ok(input.trim().to_string())
}
