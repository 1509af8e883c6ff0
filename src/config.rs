use crate::errors::Result;
use serde::Deserialize;
use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The action reference kept in sync when none is configured.
pub const DEFAULT_ACTION: &str = "dtolnay/rust-toolchain";

/// Configuration for a sync or check run.
///
/// Every field is optional; anything absent falls back to the built-in
/// defaults (well-known pin file names, `.github/workflows/` discovery, and
/// [`DEFAULT_ACTION`]). Command-line flags override file values.
#[derive(Deserialize, Clone, Default)]
pub struct SyncConfig {
    /// Explicit pin file path, relative to the target directory.
    #[serde(default)]
    pub pin_file: Option<PathBuf>,
    /// The symbolic action reference to keep in sync.
    #[serde(default)]
    pub action: Option<String>,
    /// An explicit list of workflow files to process instead of discovery.
    #[serde(default)]
    pub workflows: Option<Vec<PathBuf>>,
}

/// A utility for locating and loading run configurations.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Finds the configuration file by searching in a prioritized list of locations.
    ///
    /// The search order is:
    /// 1. The absolute path provided in `config_path`, if it exists.
    /// 2. A path relative to the current directory.
    /// 3. A path relative to the `working_dir`.
    /// 4. Inside the `~/.pinsync` directory.
    /// 5. Next to the executable.
    pub fn find_config(config_path: &Path, working_dir: &Path) -> Result<PathBuf> {
        if config_path.is_absolute() && config_path.exists() {
            return Ok(config_path.to_path_buf());
        }

        if config_path.exists() {
            return Ok(config_path.to_path_buf());
        }

        let in_working_dir = working_dir.join(config_path);
        if in_working_dir.exists() {
            return Ok(in_working_dir);
        }

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home).join(".pinsync").join(config_path);
            if home_config.exists() {
                return Ok(home_config);
            }
        }

        if let Ok(exe_path) = env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let exe_config = exe_dir.join(config_path);
                if exe_config.exists() {
                    return Ok(exe_config);
                }
            }
        }

        let mut tried_locations = vec![
            config_path.display().to_string(),
            in_working_dir.display().to_string(),
        ];
        if let Some(home) = env::var_os("HOME") {
            tried_locations.push(
                PathBuf::from(home)
                    .join(".pinsync")
                    .join(config_path)
                    .display()
                    .to_string(),
            );
        }

        Err(format!(
            "Config file '{}' not found. Searched in:\n  - {}",
            config_path.display(),
            tried_locations.join("\n  - ")
        )
        .into())
    }

    /// Loads a `SyncConfig` from a YAML file.
    pub fn load(path: &Path) -> Result<SyncConfig> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }
}
