use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in the `pinsync` application.
///
/// This enum uses `thiserror` to neatly wrap various kinds of errors that can occur,
/// from I/O issues to configuration parsing problems.
#[derive(Error, Debug)]
pub enum Error {
    /// An error related to file system I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// An error that occurred while parsing a YAML configuration file.
    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A general configuration-related error.
    #[error("Config error: {0}")]
    Config(String),

    /// The pin file contained no line matching the version pattern.
    #[error("No toolchain version found in {}", .path.display())]
    VersionNotFound { path: PathBuf },

    /// The captured token matched the version shape but is not a valid semantic version.
    #[error("Invalid toolchain version '{token}' in {}: {source}", .path.display())]
    InvalidVersion {
        token: String,
        path: PathBuf,
        source: semver::Error,
    },

    /// An error that occurred during the processing of a single file.
    #[error("File processing failed for {}: {source}", .path.display())]
    Processing {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An error from the `ignore` crate, which is used for directory traversal.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),

    /// An error related to persisting a temporary file.
    #[error("Tempfile error: {0}")]
    TempFile(#[from] tempfile::PersistError),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, pinsync::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Config(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Config(s.to_string())
    }
}
