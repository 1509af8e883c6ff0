//! `pinsync` keeps GitHub Actions workflow files in sync with a repository's
//! Rust toolchain pin.
//!
//! It provides the core logic for the `pinsync` command-line tool but can also
//! be used as a standalone library. The main components are:
//!
//! - `Extractor`: line-oriented extraction of the pinned version from the
//!   toolchain pin file.
//! - `Replacer`: global find-and-replace inside workflow files, with atomic
//!   writes, backups, and dry runs.
//! - `Checker`: staleness scan of version-pinned action references.
//! - `config`: built-in defaults plus an optional YAML override file.
//! - `discovery`: locating workflow files under `.github/workflows/`.
//!
//! A sync run is a one-shot batch: the version is extracted once, then each
//! target file is rewritten in turn, stopping at the first error.

pub mod checker;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod extractor;
pub mod pin;
pub mod replacer;
pub mod report;
pub mod sync;

// Re-export main types for easier access by library users.
pub use checker::Checker;
pub use errors::{Error, Result};
pub use extractor::Extractor;
pub use replacer::Replacer;
pub use report::{CheckReport, OutputFormat, ReportWriter};
