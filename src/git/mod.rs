//! External VCS tool abstraction layer
//!
//! Every git interaction goes through the [Vcs] trait so the inspector and the
//! release workflow can run against a real `git` executable or a scripted
//! test double.
//!
//! - [command::GitCli]: spawns the system `git` with an explicit working directory
//! - [mock::MockVcs]: replays canned outputs and records invocations
//!
//! The working directory is passed to each invocation; the process-wide
//! current directory is never changed.

pub mod command;
pub mod mock;

pub use command::GitCli;
pub use mock::MockVcs;

use crate::error::Result;
use std::path::Path;

/// Captured result of one external tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolOutput {
    /// Successful, silent output
    pub fn ok(stdout: impl Into<String>) -> Self {
        ToolOutput {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    /// Failed output with an error stream
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        ToolOutput {
            stdout: String::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Text worth surfacing as a warning: the error stream, or the exit code
    /// when the tool failed silently
    pub fn problem(&self) -> Option<String> {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return Some(stderr.to_string());
        }
        if !self.success() {
            return Some(match self.code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            });
        }
        None
    }
}

/// Git operations needed by the release workflow
///
/// Implementations only need [Vcs::run]; the named operations map onto the
/// command lines the workflow relies on. A spawn failure is an `Err`; a
/// non-zero exit or error-stream output is reported through [ToolOutput].
pub trait Vcs: Send + Sync {
    /// Run the tool with `args` inside `dir`
    fn run(&self, dir: &Path, args: &[&str]) -> Result<ToolOutput>;

    /// Machine-readable status (`XY <path>` per line)
    fn status_porcelain(&self, dir: &Path) -> Result<ToolOutput> {
        self.run(dir, &["status", "--porcelain"])
    }

    /// One-line summary of the working diff against HEAD
    fn diff_shortstat(&self, dir: &Path) -> Result<ToolOutput> {
        self.run(dir, &["diff", "HEAD", "--shortstat"])
    }

    fn stage_all(&self, dir: &Path) -> Result<ToolOutput> {
        self.run(dir, &["add", "."])
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<ToolOutput> {
        self.run(dir, &["commit", "-m", message])
    }

    fn push(&self, dir: &Path) -> Result<ToolOutput> {
        self.run(dir, &["push"])
    }

    /// Name of the checked-out branch, if it can be determined
    fn current_branch(&self, dir: &Path) -> Option<String> {
        let output = self.run(dir, &["rev-parse", "--abbrev-ref", "HEAD"]).ok()?;
        let name = output.stdout.trim();
        (output.success() && !name.is_empty()).then(|| name.to_string())
    }
}
