use std::fmt;
use std::path::PathBuf;

/// Non-fatal issues met while scanning, inspecting or releasing a repository.
/// These are shown next to the affected entry; the batch carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// A directory could not be read during the scan
    UnreadableDirectory { path: PathBuf, reason: String },
    /// The manifest exists but its version field is missing or malformed
    ManifestVersion { path: PathBuf, reason: String },
    /// The manifest could not be read or rewritten
    ManifestIo { path: PathBuf, reason: String },
    /// The external VCS tool failed or wrote to its error stream
    ToolFailure { step: String, detail: String },
}

impl ReleaseWarning {
    pub fn tool(step: impl Into<String>, detail: impl Into<String>) -> Self {
        ReleaseWarning::ToolFailure {
            step: step.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::UnreadableDirectory { path, reason } => {
                write!(f, "Skipped unreadable directory '{}': {}", path.display(), reason)
            }
            ReleaseWarning::ManifestVersion { path, reason } => {
                write!(
                    f,
                    "No version bump for '{}': {}",
                    path.display(),
                    reason
                )
            }
            ReleaseWarning::ManifestIo { path, reason } => {
                write!(f, "Manifest '{}' not updated: {}", path.display(), reason)
            }
            ReleaseWarning::ToolFailure { step, detail } => {
                write!(f, "git {} reported: {}", step, detail)
            }
        }
    }
}
