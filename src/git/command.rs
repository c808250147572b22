use crate::error::{ReleaseError, Result};
use crate::git::{ToolOutput, Vcs};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs the system `git` executable
pub struct GitCli {
    executable: String,
}

impl GitCli {
    /// Use `git` from `PATH`
    pub fn new() -> Self {
        Self::with_executable("git")
    }

    /// Use a specific executable (name or path)
    pub fn with_executable(executable: impl Into<String>) -> Self {
        GitCli {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for GitCli {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<ToolOutput> {
        debug!(dir = %dir.display(), "{} {}", self.executable, args.join(" "));

        let output = Command::new(&self.executable)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ReleaseError::external_tool(format!(
                    "Failed to run {} {} in {}: {}",
                    self.executable,
                    args.join(" "),
                    dir.display(),
                    e
                ))
            })?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }

    /// Read HEAD directly instead of spawning `rev-parse`
    fn current_branch(&self, dir: &Path) -> Option<String> {
        let repo = git2::Repository::open(dir).ok()?;
        let head = repo.head().ok()?;
        head.shorthand().map(|name| name.to_string())
    }
}
