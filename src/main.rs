use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use snapkeep::cli::{handle_snapshot_command, RunStatus, SnapshotCommands};

#[derive(Parser)]
#[command(
    name = "snapkeep",
    version,
    about = "Filtered project snapshot tool",
    long_about = "snapkeep creates clean, timestamped snapshots of a project \
                  directory, excluding heavy folders like node_modules and \
                  build output. Each snapshot is verified, annotated with \
                  provenance metadata, and subject to a retention policy."
)]
struct Cli {
    /// Project root directory (default: current directory)
    #[arg(long, global = true, env = "SNAPKEEP_PROJECT_ROOT", default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
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

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Running with no subcommand takes a snapshot non-interactively.
    let cmd = match cli.command {
        Some(Commands::Create { interactive }) => SnapshotCommands::Create { interactive },
        Some(Commands::List { verbose }) => SnapshotCommands::List { verbose },
        Some(Commands::Prune { force }) => SnapshotCommands::Prune { force },
        None => SnapshotCommands::Create { interactive: false },
    };

    let status = handle_snapshot_command(&cli.project_root, cmd)?;

    match status {
        RunStatus::Success | RunStatus::Cancelled => Ok(()),
        RunStatus::Degraded => std::process::exit(1),
    }
}
