use crate::errors::Result;
use regex::Regex;
use semver::Version;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Builds the regex source matching a version-pinned reference to `action`,
/// capturing the version token.
pub fn action_pattern(action: &str) -> String {
    format!(r"{}@(\d+\.\d+\.\d+)", regex::escape(action))
}

/// A version-pinned action reference found in a workflow file.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRef {
    /// The path to the file containing the reference.
    pub file_path: PathBuf,
    /// The 1-based line number of the reference.
    pub line_number: usize,
    /// The content of the line that contained the reference.
    pub line_content: String,
    /// The version the reference is pinned to.
    pub version: String,
}

impl ActionRef {
    /// Whether the reference disagrees with the pinned version.
    pub fn is_stale(&self, pinned: &Version) -> bool {
        self.version != pinned.to_string()
    }
}

/// Line scanner for versioned action references.
pub struct Checker {
    pattern: Regex,
}

impl Checker {
    pub fn new(action: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(&action_pattern(action))?,
        })
    }

    /// Collects every versioned reference to the action in a file, in line
    /// order. A line can contribute more than one reference.
    pub fn check_file(&self, path: &Path) -> Result<Vec<ActionRef>> {
        let file = File::open(path)?;
        let mut refs = Vec::new();

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            for caps in self.pattern.captures_iter(&line) {
                refs.push(ActionRef {
                    file_path: path.to_path_buf(),
                    line_number: idx + 1,
                    line_content: line.clone(),
                    version: caps[1].to_string(),
                });
            }
        }

        Ok(refs)
    }
}
