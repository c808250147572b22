use crate::error::{ReleaseError, Result};
use crate::git::{ToolOutput, Vcs};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Scripted VCS for testing without spawning processes
///
/// Responses are keyed by directory and the space-joined argument list.
/// Unscripted invocations succeed with empty output. Every call is recorded.
pub struct MockVcs {
    responses: HashMap<(PathBuf, String), ToolOutput>,
    failing_dirs: Vec<PathBuf>,
    calls: Mutex<Vec<(PathBuf, String)>>,
}

impl MockVcs {
    /// Create a mock where every repository is clean
    pub fn new() -> Self {
        MockVcs {
            responses: HashMap::new(),
            failing_dirs: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the output for `args` run in `dir`
    pub fn respond(&mut self, dir: impl Into<PathBuf>, args: &str, output: ToolOutput) {
        self.responses.insert((dir.into(), args.to_string()), output);
    }

    /// Script porcelain status lines for `dir`
    pub fn set_status(&mut self, dir: impl Into<PathBuf>, lines: &[&str]) {
        let mut stdout = lines.join("\n");
        if !stdout.is_empty() {
            stdout.push('\n');
        }
        self.respond(dir, "status --porcelain", ToolOutput::ok(stdout));
    }

    /// Script the shortstat line for `dir`
    pub fn set_shortstat(&mut self, dir: impl Into<PathBuf>, line: &str) {
        self.respond(dir, "diff HEAD --shortstat", ToolOutput::ok(format!("{}\n", line)));
    }

    /// Make every invocation in `dir` fail to spawn
    pub fn fail_spawn(&mut self, dir: impl Into<PathBuf>) {
        self.failing_dirs.push(dir.into());
    }

    /// All recorded invocations, in order
    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Recorded argument lines for `dir`
    pub fn calls_in(&self, dir: &Path) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(d, _)| d == dir)
            .map(|(_, args)| args)
            .collect()
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<ToolOutput> {
        let joined = args.join(" ");
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((dir.to_path_buf(), joined.clone()));
        }

        if self.failing_dirs.iter().any(|d| d == dir) {
            return Err(ReleaseError::external_tool(format!(
                "mock spawn failure in {}",
                dir.display()
            )));
        }

        Ok(self
            .responses
            .get(&(dir.to_path_buf(), joined))
            .cloned()
            .unwrap_or_else(|| ToolOutput::ok("")))
    }
}
