use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::change::ChangeStatus;
use crate::domain::manifest::ManifestKeys;
use crate::domain::version::Increment;
use crate::error::Result;

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "gitrelease.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILE: &str = ".gitrelease.toml";

/// Represents the complete configuration for git-batch-release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Directory scanned for working trees; remembered across sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_marker() -> String {
    ".git".to_string()
}

fn default_ignored_suffixes() -> Vec<String> {
    vec![".meta".to_string()]
}

fn default_true() -> bool {
    true
}

/// Repository discovery and change filtering.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScanConfig {
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Path suffixes of editor sidecar files left out of change records
    #[serde(default = "default_ignored_suffixes")]
    pub ignored_suffixes: Vec<String>,

    #[serde(default = "default_true")]
    pub untracked_as_added: bool,
}

impl ScanConfig {
    /// Classification used for `??` porcelain entries
    pub fn untracked_status(&self) -> ChangeStatus {
        if self.untracked_as_added {
            ChangeStatus::Added
        } else {
            ChangeStatus::Untracked
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            marker: default_marker(),
            ignored_suffixes: default_ignored_suffixes(),
            untracked_as_added: true,
        }
    }
}

fn default_manifest_file() -> String {
    "package.json".to_string()
}

fn default_version_key() -> String {
    "version".to_string()
}

fn default_name_key() -> String {
    "displayName".to_string()
}

/// Location and keys of the per-repository manifest.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_file")]
    pub file_name: String,

    #[serde(default = "default_version_key")]
    pub version_key: String,

    #[serde(default = "default_name_key")]
    pub name_key: String,
}

impl ManifestConfig {
    pub fn keys(&self) -> ManifestKeys {
        ManifestKeys {
            version: self.version_key.clone(),
            display_name: self.name_key.clone(),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            file_name: default_manifest_file(),
            version_key: default_version_key(),
            name_key: default_name_key(),
        }
    }
}

fn default_commit_message() -> String {
    "fixes".to_string()
}

/// Defaults restored each time the workflow moves to a new repository.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct WorkflowConfig {
    #[serde(default = "default_commit_message")]
    pub default_commit_message: String,

    #[serde(default)]
    pub default_increment: Increment,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            default_commit_message: default_commit_message(),
            default_increment: Increment::Minor,
        }
    }
}

fn default_executable() -> String {
    "git".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            executable: default_executable(),
        }
    }
}

/// Path of the per-user configuration file, if a config directory exists
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_CONFIG_FILE))
}

/// Loads configuration from file or returns defaults.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(path) = user_config_path().filter(|p| p.exists()) {
        fs::read_to_string(path)?
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Writes `config` to `config_path`, or to the user config file when `None`.
///
/// Returns the path written.
pub fn save_config(config: &Config, config_path: Option<&Path>) -> Result<PathBuf> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => user_config_path().ok_or_else(|| {
            crate::error::ReleaseError::config("no user configuration directory available")
        })?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    fs::write(&path, toml::to_string_pretty(config)?)?;
    Ok(path)
}
