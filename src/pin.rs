use crate::errors::{Error, Result};
use crate::extractor::Extractor;
use semver::Version;
use std::path::{Path, PathBuf};

/// Line pattern for the legacy `rust-toolchain` format, where the version
/// stands alone on its own line.
pub const LEGACY_PIN_PATTERN: &str = r"^(\d+\.\d+\.\d+)\s*$";

/// Line pattern for the `rust-toolchain.toml` format. Anchoring on the
/// `channel` key keeps version-shaped tokens elsewhere in the file from
/// matching.
pub const TOML_PIN_PATTERN: &str = r#"^channel\s*=\s*"(\d+\.\d+\.\d+)""#;

/// Pin file names tried in order when no explicit path is given.
const PIN_FILE_NAMES: [&str; 2] = ["rust-toolchain", "rust-toolchain.toml"];

/// Resolves the pin file for a run.
///
/// An explicit path wins (relative paths are resolved against `dir`);
/// otherwise the well-known pin file names are tried in order under `dir`.
pub fn locate_pin_file(dir: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            dir.join(path)
        };
        if resolved.is_file() {
            return Ok(resolved);
        }
        return Err(format!("Pin file '{}' not found", resolved.display()).into());
    }

    for name in PIN_FILE_NAMES {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(format!(
        "No pin file found in '{}' (looked for {})",
        dir.display(),
        PIN_FILE_NAMES.join(", ")
    )
    .into())
}

/// Selects the extraction pattern matching the pin file's format.
pub fn pattern_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => TOML_PIN_PATTERN,
        _ => LEGACY_PIN_PATTERN,
    }
}

/// Reads the pinned toolchain version from a pin file.
///
/// Extraction failure is loud: a pin file with no version line yields
/// `Error::VersionNotFound` rather than an empty token, and a captured token
/// that does not parse as a semantic version yields `Error::InvalidVersion`.
pub fn read_pinned_version(path: &Path) -> Result<Version> {
    let extractor = Extractor::new(pattern_for(path))?;
    let token = extractor
        .extract(path)?
        .ok_or_else(|| Error::VersionNotFound {
            path: path.to_path_buf(),
        })?;

    Version::parse(&token).map_err(|source| Error::InvalidVersion {
        token,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_legacy_pin() {
        let temp_dir = TempDir::new().unwrap();
        let pin = temp_dir.path().join("rust-toolchain");
        fs::write(&pin, "1.75.0\n").unwrap();

        let version = read_pinned_version(&pin).unwrap();
        assert_eq!(version, Version::new(1, 75, 0));
    }

    #[test]
    fn test_reads_toml_pin_channel() {
        let temp_dir = TempDir::new().unwrap();
        let pin = temp_dir.path().join("rust-toolchain.toml");
        fs::write(
            &pin,
            "[toolchain]\nchannel = \"1.75.0\"\ncomponents = [\"clippy\"]\n",
        )
        .unwrap();

        let version = read_pinned_version(&pin).unwrap();
        assert_eq!(version, Version::new(1, 75, 0));
    }

    #[test]
    fn test_toml_pin_ignores_non_channel_versions() {
        let temp_dir = TempDir::new().unwrap();
        let pin = temp_dir.path().join("rust-toolchain.toml");
        // A version-shaped token on an unrelated line must not match.
        fs::write(&pin, "# since 1.70.0\n[toolchain]\nprofile = \"minimal\"\n").unwrap();

        let err = read_pinned_version(&pin).unwrap_err();
        assert!(matches!(err, Error::VersionNotFound { .. }));
    }

    #[test]
    fn test_missing_version_is_loud() {
        let temp_dir = TempDir::new().unwrap();
        let pin = temp_dir.path().join("rust-toolchain");
        fs::write(&pin, "stable\n").unwrap();

        let err = read_pinned_version(&pin).unwrap_err();
        assert!(matches!(err, Error::VersionNotFound { .. }));
    }

    #[test]
    fn test_locates_legacy_before_toml() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("rust-toolchain"), "1.75.0\n").unwrap();
        fs::write(
            temp_dir.path().join("rust-toolchain.toml"),
            "[toolchain]\nchannel = \"1.74.0\"\n",
        )
        .unwrap();

        let located = locate_pin_file(temp_dir.path(), None).unwrap();
        assert_eq!(located, temp_dir.path().join("rust-toolchain"));
    }

    #[test]
    fn test_explicit_pin_path_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let err = locate_pin_file(temp_dir.path(), Some(Path::new("custom-pin"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
