//! The main entry point for the `pinsync` command-line application.
//!
//! This file is responsible for parsing command-line arguments and dispatching
//! to the appropriate subcommand handler in the `pinsync` library. Running the
//! binary with no arguments performs a sync with the built-in defaults, which
//! is how the tool is typically invoked from CI.

use pinsync::cli::{self, Commands};
use pinsync::errors::Result;
use pinsync::{replacer, sync};
use std::path::PathBuf;
use std::process;

/// The main function of the application.
///
/// It parses arguments and executes the corresponding command.
fn main() -> Result<()> {
    let args = cli::parse_args();

    match args.command {
        None => sync::run_sync(
            PathBuf::from("."),
            None,
            None,
            Vec::new(),
            None,
            false,
            false,
            false,
        ),
        Some(Commands::Sync {
            dir,
            pin_file,
            config,
            workflows,
            action,
            no_backup,
            dry_run,
            verbose,
        }) => sync::run_sync(
            dir, pin_file, config, workflows, action, no_backup, dry_run, verbose,
        ),
        Some(Commands::Check {
            dir,
            pin_file,
            config,
            workflows,
            action,
            format,
            output,
        }) => {
            let in_sync = sync::run_check(dir, pin_file, config, workflows, action, format, output)?;
            if !in_sync {
                process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Undo { dir, keep_backups }) => replacer::run_undo(dir, keep_backups),
    }
}
