use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keeps CI workflow files pointed at the pinned Rust toolchain.
///
/// `pinsync` reads the exact version from the repository's toolchain pin file
/// and rewrites every version-pinned reference to the toolchain action in the
/// workflow files to match it.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Sync workflow action pins with the rust-toolchain file",
    long_about = "pinsync - keeps CI workflow files pointed at the pinned Rust toolchain.

It reads the exact version from rust-toolchain (or rust-toolchain.toml),
prints it, and rewrites every dtolnay/rust-toolchain@<version> reference in
the repository's workflow files to match.

QUICK EXAMPLES:
  pinsync                         # Sync workflows in the current repository
  pinsync sync --dry-run          # Preview the rewrite
  pinsync check                   # Exit non-zero when workflows are stale
  pinsync undo -d .               # Restore workflows from backups

For detailed help on any command, use: pinsync <command> --help"
)]
pub struct Args {
    /// Running without a subcommand performs `sync` with built-in defaults.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// The set of available commands for the `pinsync` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite workflow action references to the pinned toolchain version
    ///
    /// EXAMPLES:
    ///   pinsync sync                        # Sync the current repository
    ///   pinsync sync -d ../other-repo       # Sync another checkout
    ///   pinsync sync --dry-run --verbose    # Preview per-file changes
    ///   pinsync sync -w .github/workflows/test.yml -w .github/workflows/test-slim.yml
    ///
    /// Config file format (pinsync.yaml):
    ///   pin_file: rust-toolchain.toml
    ///   action: dtolnay/rust-toolchain
    ///   workflows:
    ///     - .github/workflows/test.yml
    Sync {
        /// The repository root to operate on.
        #[arg(short, long, default_value = ".", env = "PINSYNC_DIR")]
        dir: PathBuf,

        /// Path to the toolchain pin file. Defaults to `rust-toolchain`,
        /// then `rust-toolchain.toml`, under the repository root.
        #[arg(short, long)]
        pin_file: Option<PathBuf>,

        /// Path to a YAML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// A workflow file to rewrite (repeatable). Defaults to every file
        /// under `.github/workflows/`.
        #[arg(short, long = "workflow")]
        workflows: Vec<PathBuf>,

        /// The symbolic action reference to keep in sync.
        #[arg(short, long)]
        action: Option<String>,

        /// Disable the creation of backup files (`.bak`).
        #[arg(long)]
        no_backup: bool,

        /// Preview the changes without actually modifying any files.
        #[arg(long)]
        dry_run: bool,

        /// Print each modified file.
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report workflow references that disagree with the pin
    ///
    /// Exits with status 1 when stale references exist, which makes the
    /// command usable as a CI gate.
    ///
    /// EXAMPLES:
    ///   pinsync check                       # Human-readable report
    ///   pinsync check -f json               # Machine-readable report
    ///   pinsync check -f json -o report.json
    Check {
        /// The repository root to operate on.
        #[arg(short, long, default_value = ".", env = "PINSYNC_DIR")]
        dir: PathBuf,

        /// Path to the toolchain pin file. Defaults to `rust-toolchain`,
        /// then `rust-toolchain.toml`, under the repository root.
        #[arg(short, long)]
        pin_file: Option<PathBuf>,

        /// Path to a YAML configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// A workflow file to scan (repeatable). Defaults to every file
        /// under `.github/workflows/`.
        #[arg(short, long = "workflow")]
        workflows: Vec<PathBuf>,

        /// The symbolic action reference to check.
        #[arg(short, long)]
        action: Option<String>,

        /// The output format for the check report (`text` or `json`).
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Path to the output file. If omitted, the report is written to
        /// standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore workflow files from backups (undo a sync)
    ///
    /// EXAMPLES:
    ///   pinsync undo -d .                   # Restore all files
    ///   pinsync undo -d . --keep-backups    # Restore but keep .bak files
    Undo {
        /// The directory where the `sync` operation was run.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Keep the backup files after restoring the original files.
        #[arg(long)]
        keep_backups: bool,
    },
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
