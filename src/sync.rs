use crate::checker::{self, Checker};
use crate::config::{ConfigLoader, DEFAULT_ACTION, SyncConfig};
use crate::discovery;
use crate::errors::{Error, Result};
use crate::pin;
use crate::replacer::{ProcessOptions, Replacer};
use crate::report::{CheckReport, OutputFormat, ReportWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// The resolved inputs of a run: pin file, action reference, and target
/// workflow files, merged from built-in defaults, the optional configuration
/// file, and command-line flags (flags win).
struct RunPlan {
    pin_file: PathBuf,
    action: String,
    workflows: Vec<PathBuf>,
}

fn build_plan(
    dir: &Path,
    pin_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    workflows: Vec<PathBuf>,
    action: Option<String>,
) -> Result<RunPlan> {
    let file_config = match config_file {
        Some(path) => {
            let resolved = ConfigLoader::find_config(&path, dir)?;
            println!("Using config file: {}", resolved.display());
            ConfigLoader::load(&resolved)?
        }
        None => SyncConfig::default(),
    };

    let pin_override = pin_file.or(file_config.pin_file);
    let pin_path = pin::locate_pin_file(dir, pin_override.as_deref())?;

    let action = action
        .or(file_config.action)
        .unwrap_or_else(|| DEFAULT_ACTION.to_string());

    let workflows = if !workflows.is_empty() {
        resolve_against(dir, workflows)
    } else if let Some(listed) = file_config.workflows {
        resolve_against(dir, listed)
    } else {
        discovery::discover_workflows(dir)?
    };

    if workflows.is_empty() {
        return Err(format!("No workflow files to process under '{}'", dir.display()).into());
    }

    Ok(RunPlan {
        pin_file: pin_path,
        action,
        workflows,
    })
}

fn resolve_against(dir: &Path, paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .map(|p| if p.is_absolute() { p } else { dir.join(p) })
        .collect()
}

/// The main entry point for the `sync` command.
///
/// This function orchestrates the entire run:
/// 1. It resolves the pin file, action reference, and workflow targets.
/// 2. It extracts the pinned version and prints it to stdout.
/// 3. It rewrites each workflow file in turn, stopping at the first error.
/// 4. It prints summary statistics.
///
/// Extraction failure aborts the run before any workflow file is modified.
pub fn run_sync(
    dir: PathBuf,
    pin_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    workflows: Vec<PathBuf>,
    action: Option<String>,
    no_backup: bool,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    let plan = build_plan(&dir, pin_file, config_file, workflows, action)?;
    let version = pin::read_pinned_version(&plan.pin_file)?;

    // The pinned version goes to stdout for CI log inspection.
    println!("{version}");

    let replacer = Replacer::new(
        &checker::action_pattern(&plan.action),
        format!("{}@{}", plan.action, version),
    )?;

    let options = ProcessOptions {
        create_backup: !no_backup,
        dry_run,
    };
    let log_changes = verbose || dry_run;

    let mut processed = 0usize;
    let mut modified = 0usize;
    let mut total_changes = 0usize;

    for path in &plan.workflows {
        let result = replacer
            .process_file(path, options)
            .map_err(|e| Error::Processing {
                path: path.clone(),
                source: Box::new(e),
            })?;
        processed += 1;
        if result.modified {
            modified += 1;
            total_changes += result.changes;
            if log_changes {
                if dry_run {
                    println!("DRY Modified {} ({} changes)", path.display(), result.changes);
                } else {
                    println!("Modified {} ({} changes)", path.display(), result.changes);
                }
            }
        }
    }

    println!("\n{}", "-".repeat(50));
    println!("Files scanned : {processed}");
    println!("Files changed : {modified}");
    println!("Total edits   : {total_changes}");

    Ok(())
}

/// The main entry point for the `check` command.
///
/// Scans the workflow files for versioned action references, reports the ones
/// that disagree with the pin, and returns whether everything is in sync.
/// Nothing is modified.
pub fn run_check(
    dir: PathBuf,
    pin_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    workflows: Vec<PathBuf>,
    action: Option<String>,
    format: String,
    output: Option<PathBuf>,
) -> Result<bool> {
    let plan = build_plan(&dir, pin_file, config_file, workflows, action)?;
    let version = pin::read_pinned_version(&plan.pin_file)?;
    let checker = Checker::new(&plan.action)?;

    let mut references = 0usize;
    let mut stale = Vec::new();
    for path in &plan.workflows {
        let refs = checker.check_file(path).map_err(|e| Error::Processing {
            path: path.clone(),
            source: Box::new(e),
        })?;
        references += refs.len();
        stale.extend(refs.into_iter().filter(|r| r.is_stale(&version)));
    }

    let report = CheckReport::new(version.to_string(), plan.workflows.len(), references, stale);

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };
    ReportWriter::new(OutputFormat::from(format.as_str())).write_report(&mut writer, &report)?;

    Ok(report.in_sync)
}
