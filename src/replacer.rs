use crate::errors::Result;
use ignore::WalkBuilder;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Core engine for rewriting pattern matches inside a file.
///
/// A `Replacer` is configured with one regex pattern and one replacement
/// template. It rewrites every non-overlapping match across a file's entire
/// content, not line by line, so the same instance can be applied to any
/// number of target files.
pub struct Replacer {
    pattern: Regex,
    replacement: String,
}

/// Options for processing a file.
#[derive(Clone, Copy)]
pub struct ProcessOptions {
    /// If `true`, a `.bak` file will be created before modifying a file.
    pub create_backup: bool,
    /// If `true`, changes will be calculated but not written to disk.
    pub dry_run: bool,
}

/// The result of processing a single file.
pub struct ProcessResult {
    /// The number of occurrences that were (or would be) rewritten.
    pub changes: usize,
    /// `true` if the file content changed.
    pub modified: bool,
}

/// Statistics from an `undo` operation.
pub struct UndoStats {
    /// The number of backup files found.
    pub found: usize,
    /// The number of files successfully restored from backups.
    pub restored: usize,
}

impl Replacer {
    /// Creates a new `Replacer` from a pattern and a replacement template.
    ///
    /// The template may reference capture groups from the pattern (`$1`,
    /// `$2`, ...).
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Rewrites every match of the pattern in a single file.
    ///
    /// The file is read as one string and every non-overlapping match is
    /// substituted. A file whose content would not change is left untouched
    /// on disk, so a no-match substitution is a harmless no-op and a second
    /// identical pass is a fixed point. When the content does change and
    /// `dry_run` is off, the new content is written atomically: a temp file
    /// in the target's directory takes the original's permissions and is
    /// renamed over it.
    pub fn process_file(&self, path: &Path, options: ProcessOptions) -> Result<ProcessResult> {
        let content = fs::read_to_string(path)?;

        let matches = self.pattern.find_iter(&content).count();
        if matches == 0 {
            return Ok(ProcessResult {
                changes: 0,
                modified: false,
            });
        }

        let new_content = self.pattern.replace_all(&content, self.replacement.as_str());
        if new_content.as_ref() == content.as_str() {
            // Every match already carries the replacement text.
            return Ok(ProcessResult {
                changes: 0,
                modified: false,
            });
        }

        if !options.dry_run {
            if options.create_backup {
                let backup_path = format!("{}.bak", path.display());
                fs::copy(path, &backup_path)?;
            }
            write_atomic(path, new_content.as_ref())?;
        }

        Ok(ProcessResult {
            changes: matches,
            modified: true,
        })
    }

    /// Scans a directory for `.bak` files and restores them.
    ///
    /// # Arguments
    ///
    /// * `dir` - The directory to scan for backup files.
    /// * `keep_backups` - If `false`, the `.bak` files will be deleted after being restored.
    pub fn undo(dir: &Path, keep_backups: bool) -> Result<UndoStats> {
        let mut found = 0;
        let mut restored = 0;

        // Backups live under `.github/workflows`, so the walk must descend
        // into hidden directories.
        let mut walker = WalkBuilder::new(dir);
        walker.standard_filters(true);
        walker.hidden(false);

        for entry in walker.build() {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("bak") {
                found += 1;
                let original_path = path.with_extension("");
                fs::copy(path, &original_path)?;
                if !keep_backups {
                    fs::remove_file(path)?;
                }
                restored += 1;
                println!("Restored {}", original_path.display());
            }
        }

        Ok(UndoStats { found, restored })
    }
}

/// Writes content over `path` via a temp file in the same directory, keeping
/// the original file's permissions.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Err(format!("Could not get parent directory for {}", path.display()).into());
    };

    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;

    let perms = fs::metadata(path)?.permissions();
    fs::set_permissions(temp_file.path(), perms)?;

    temp_file.persist(path)?;
    Ok(())
}

/// The main entry point for the `undo` command.
pub fn run_undo(dir: PathBuf, keep_backups: bool) -> Result<()> {
    let stats = Replacer::undo(&dir, keep_backups)?;
    println!(
        "\nBackups found: {}, restored: {}",
        stats.found, stats.restored
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const OPTIONS: ProcessOptions = ProcessOptions {
        create_backup: false,
        dry_run: false,
    };

    fn action_replacer(version: &str) -> Replacer {
        Replacer::new(
            r"dtolnay/rust-toolchain@\d+\.\d+\.\d+",
            format!("dtolnay/rust-toolchain@{version}"),
        )
        .unwrap()
    }

    #[test]
    fn test_rewrites_every_occurrence() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        let content = "uses: dtolnay/rust-toolchain@1.70.0\n".repeat(3);
        fs::write(&file, &content).unwrap();

        let result = action_replacer("1.75.0").process_file(&file, OPTIONS).unwrap();

        assert_eq!(result.changes, 3);
        assert!(result.modified);
        let rewritten = fs::read_to_string(&file).unwrap();
        assert_eq!(
            rewritten,
            "uses: dtolnay/rust-toolchain@1.75.0\n".repeat(3)
        );
    }

    #[test]
    fn test_second_pass_is_fixed_point() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        fs::write(&file, "uses: dtolnay/rust-toolchain@1.70.0\n").unwrap();

        let replacer = action_replacer("1.75.0");
        replacer.process_file(&file, OPTIONS).unwrap();
        let after_first = fs::read_to_string(&file).unwrap();

        let result = replacer.process_file(&file, OPTIONS).unwrap();

        assert_eq!(result.changes, 0);
        assert!(!result.modified);
        assert_eq!(fs::read_to_string(&file).unwrap(), after_first);
    }

    #[test]
    fn test_untouched_when_pattern_absent() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        let content = "uses: actions/checkout@v4\nruns-on: ubuntu-latest\n";
        fs::write(&file, content).unwrap();

        let options = ProcessOptions {
            create_backup: true,
            dry_run: false,
        };
        let result = action_replacer("1.75.0").process_file(&file, options).unwrap();

        assert!(!result.modified);
        assert_eq!(fs::read_to_string(&file).unwrap(), content);
        // No backup for an untouched file.
        assert!(!temp_dir.path().join("test.yml.bak").exists());
    }

    #[test]
    fn test_dry_run_counts_but_leaves_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        let content = "uses: dtolnay/rust-toolchain@1.70.0\n".repeat(2);
        fs::write(&file, &content).unwrap();

        let options = ProcessOptions {
            create_backup: true,
            dry_run: true,
        };
        let result = action_replacer("1.75.0").process_file(&file, options).unwrap();

        assert_eq!(result.changes, 2);
        assert!(result.modified);
        assert_eq!(fs::read_to_string(&file).unwrap(), content);
        assert!(!temp_dir.path().join("test.yml.bak").exists());
    }

    #[test]
    fn test_backup_holds_original_content() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        fs::write(&file, "uses: dtolnay/rust-toolchain@1.70.0\n").unwrap();

        let options = ProcessOptions {
            create_backup: true,
            dry_run: false,
        };
        action_replacer("1.75.0").process_file(&file, options).unwrap();

        let backup = temp_dir.path().join("test.yml.bak");
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            "uses: dtolnay/rust-toolchain@1.70.0\n"
        );
    }

    #[test]
    fn test_undo_restores_originals() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        fs::write(&file, "uses: dtolnay/rust-toolchain@1.70.0\n").unwrap();

        let options = ProcessOptions {
            create_backup: true,
            dry_run: false,
        };
        action_replacer("1.75.0").process_file(&file, options).unwrap();

        let stats = Replacer::undo(temp_dir.path(), false).unwrap();

        assert_eq!(stats.found, 1);
        assert_eq!(stats.restored, 1);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "uses: dtolnay/rust-toolchain@1.70.0\n"
        );
        assert!(!temp_dir.path().join("test.yml.bak").exists());
    }

    #[test]
    fn test_undo_descends_into_hidden_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let workflows = temp_dir.path().join(".github").join("workflows");
        fs::create_dir_all(&workflows).unwrap();
        let file = workflows.join("test.yml");
        fs::write(&file, "uses: dtolnay/rust-toolchain@1.70.0\n").unwrap();

        let options = ProcessOptions {
            create_backup: true,
            dry_run: false,
        };
        action_replacer("1.75.0").process_file(&file, options).unwrap();

        let stats = Replacer::undo(temp_dir.path(), false).unwrap();

        assert_eq!(stats.restored, 1);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "uses: dtolnay/rust-toolchain@1.70.0\n"
        );
    }

    #[test]
    fn test_replacement_template_expands_captures() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        fs::write(&file, "uses: dtolnay/rust-toolchain@1.70.0\n").unwrap();

        let replacer =
            Replacer::new(r"(dtolnay/rust-toolchain)@\d+\.\d+\.\d+", "${1}@1.75.0").unwrap();
        replacer.process_file(&file, OPTIONS).unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "uses: dtolnay/rust-toolchain@1.75.0\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_write_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("test.yml");
        fs::write(&file, "uses: dtolnay/rust-toolchain@1.70.0\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o600)).unwrap();

        action_replacer("1.75.0").process_file(&file, OPTIONS).unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
