use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-batch-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Cannot scan '{}': {}", .path.display(), .reason)]
    ScanIo { path: PathBuf, reason: String },

    #[error("Manifest error: {0}")]
    ManifestParse(String),

    #[error("External tool failed: {0}")]
    ExternalTool(String),

    #[error("Worklist is empty: no repositories with pending changes")]
    EmptyWorklist,

    #[error("Invalid version format: {0}")]
    Format(String),

    #[error("Invalid workflow state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-batch-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a scan error for an unreadable directory
    pub fn scan_io(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ReleaseError::ScanIo {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::ManifestParse(msg.into())
    }

    /// Create an external tool error with context
    pub fn external_tool(msg: impl Into<String>) -> Self {
        ReleaseError::ExternalTool(msg.into())
    }

    /// Create a version format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        ReleaseError::Format(msg.into())
    }

    /// Create a workflow state error with context
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidState(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }
}

impl From<toml::de::Error> for ReleaseError {
    fn from(err: toml::de::Error) -> Self {
        ReleaseError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ReleaseError {
    fn from(err: toml::ser::Error) -> Self {
        ReleaseError::Config(err.to_string())
    }
}
