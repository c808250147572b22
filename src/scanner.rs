//! Discovery of working trees below a root directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ReleaseError, Result};
use crate::warning::ReleaseWarning;

/// Result of one scan: hits in traversal order plus skipped directories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    pub repositories: Vec<PathBuf>,
    pub warnings: Vec<ReleaseWarning>,
}

/// Finds directories that contain a VCS marker directory (e.g. `.git`)
pub struct RepositoryScanner {
    marker: String,
}

impl RepositoryScanner {
    pub fn new(marker: impl Into<String>) -> Self {
        RepositoryScanner {
            marker: marker.into(),
        }
    }

    /// Depth-first scan of `root`, siblings visited in file-name order.
    ///
    /// A directory holding the marker is reported and not descended into, so
    /// no reported repository is nested in another. Unreadable directories are
    /// skipped with a warning; only an unusable `root` is an error.
    pub fn scan(&self, root: &Path) -> Result<ScanReport> {
        if !root.is_dir() {
            return Err(ReleaseError::scan_io(root, "not a directory"));
        }

        let mut report = ScanReport::default();
        let mut entries = WalkDir::new(root).sort_by_file_name().into_iter();

        while let Some(entry) = entries.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| root.to_path_buf());
                    warn!(path = %path.display(), "skipping unreadable directory: {}", e);
                    report.warnings.push(ReleaseWarning::UnreadableDirectory {
                        path,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            if self.is_working_tree(entry.path()) {
                debug!(path = %entry.path().display(), "found working tree");
                report.repositories.push(entry.path().to_path_buf());
                entries.skip_current_dir();
            }
        }

        Ok(report)
    }

    /// Whether `dir` has the marker as an immediate child directory
    pub fn is_working_tree(&self, dir: &Path) -> bool {
        dir.join(&self.marker).is_dir()
    }
}

impl Default for RepositoryScanner {
    fn default() -> Self {
        Self::new(".git")
    }
}
