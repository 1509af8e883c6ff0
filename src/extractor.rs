use crate::errors::Result;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Line-oriented extraction of a single capture from a text file.
///
/// An `Extractor` holds one compiled, line-anchored pattern with exactly one
/// capturing group. It reads a file line by line and yields the group-1
/// capture from the first line the pattern matches. Later matches are never
/// examined.
pub struct Extractor {
    pattern: Regex,
}

impl Extractor {
    /// Compiles the given pattern into a new `Extractor`.
    ///
    /// The pattern is expected to be anchored with `^` and to contain exactly
    /// one capturing group. Extra groups are ignored.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Returns the first group-1 capture from the file, or `None` when no
    /// line matches.
    ///
    /// The file is read line by line rather than loaded whole. I/O failures
    /// propagate immediately.
    pub fn extract(&self, path: &Path) -> Result<Option<String>> {
        let file = File::open(path)?;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if let Some(caps) = self.pattern.captures(&line) {
                if let Some(group) = caps.get(1) {
                    return Ok(Some(group.as_str().to_string()));
                }
            }
        }
        Ok(None)
    }
}
