//! Sequential release workflow over a worklist of working trees.
//!
//! The workflow owns the worklist and a cursor into it. Each operator
//! decision (confirm or skip) moves the cursor forward by exactly one entry;
//! the cursor never moves back, so a repository that has been handled is
//! never processed again within the same run.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::change::ChangeStatus;
use crate::domain::manifest::{Manifest, ManifestKeys};
use crate::domain::version::{Increment, VersionNumber};
use crate::error::{ReleaseError, Result};
use crate::git::{ToolOutput, Vcs};
use crate::inspector::{ChangeSet, ChangeSetInspector};
use crate::warning::ReleaseWarning;

/// Shown when the branch of a working tree cannot be determined
pub const UNKNOWN_BRANCH: &str = "(unknown branch)";

/// Settings the workflow applies to every entry
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    pub manifest_file: String,
    pub manifest_keys: ManifestKeys,
    pub ignored_suffixes: Vec<String>,
    pub untracked: ChangeStatus,
    pub default_commit_message: String,
    pub default_increment: Increment,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        WorkflowSettings::from(&Config::default())
    }
}

impl From<&Config> for WorkflowSettings {
    fn from(config: &Config) -> Self {
        WorkflowSettings {
            manifest_file: config.manifest.file_name.clone(),
            manifest_keys: config.manifest.keys(),
            ignored_suffixes: config.scan.ignored_suffixes.clone(),
            untracked: config.scan.untracked_status(),
            default_commit_message: config.workflow.default_commit_message.clone(),
            default_increment: config.workflow.default_increment,
        }
    }
}

/// Where the workflow stands between operator actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No worklist loaded
    Idle,
    /// Waiting for confirm or skip on the current entry
    AwaitingDecision,
    /// Every entry has been handled
    Complete,
    /// Stopped by the operator
    Closed,
}

/// A discovered working tree and the details loaded when the cursor lands on it
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryEntry {
    pub path: PathBuf,
    /// Manifest display name, else the directory name
    pub display_name: String,
    pub branch: Option<String>,
    pub manifest: Option<Manifest>,
    pub current_version: Option<VersionNumber>,
    pub next_version: Option<VersionNumber>,
    pub changes: ChangeSet,
    pub warnings: Vec<ReleaseWarning>,
}

impl RepositoryEntry {
    /// An entry that has not been set up yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        RepositoryEntry {
            display_name: directory_name(&path),
            path,
            branch: None,
            manifest: None,
            current_version: None,
            next_version: None,
            changes: ChangeSet::default(),
            warnings: Vec::new(),
        }
    }

    /// Load manifest, branch and change set for `path`
    pub fn load<V: Vcs + ?Sized>(
        path: impl Into<PathBuf>,
        vcs: &V,
        settings: &WorkflowSettings,
        increment: Increment,
    ) -> Self {
        let mut entry = RepositoryEntry::new(path);

        match Manifest::load(&entry.path, &settings.manifest_file, &settings.manifest_keys) {
            Ok(Some(manifest)) => {
                if let Some(name) = &manifest.display_name {
                    entry.display_name = name.clone();
                }
                if let Some(reason) = &manifest.version_error {
                    warn!(path = %manifest.path.display(), "no version bump: {}", reason);
                    entry.warnings.push(ReleaseWarning::ManifestVersion {
                        path: manifest.path.clone(),
                        reason: reason.clone(),
                    });
                }
                entry.current_version = manifest.version;
                entry.manifest = Some(manifest);
                entry.propose(increment);
            }
            Ok(None) => {}
            Err(e) => {
                let path = entry.path.join(&settings.manifest_file);
                warn!(path = %path.display(), "cannot read manifest: {}", e);
                entry.warnings.push(ReleaseWarning::ManifestIo {
                    path,
                    reason: e.to_string(),
                });
            }
        }

        entry.branch = vcs.current_branch(&entry.path);
        entry.changes = ChangeSetInspector::new(vcs, &settings.ignored_suffixes)
            .untracked_as(settings.untracked)
            .inspect(&entry.path);

        entry
    }

    /// Recompute `next_version`; an increment that overflows leaves no bump
    pub fn propose(&mut self, increment: Increment) {
        self.next_version = None;
        let Some(current) = self.current_version else {
            return;
        };

        match current.increment(increment) {
            Ok(next) => self.next_version = Some(next),
            Err(e) => {
                let path = self
                    .manifest
                    .as_ref()
                    .map(|m| m.path.clone())
                    .unwrap_or_else(|| self.path.clone());
                warn!(path = %path.display(), "no version bump: {}", e);
                self.warnings.push(ReleaseWarning::ManifestVersion {
                    path,
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn has_changes(&self) -> bool {
        self.changes.has_changes()
    }

    pub fn branch_name(&self) -> &str {
        self.branch.as_deref().unwrap_or(UNKNOWN_BRANCH)
    }

    /// One `<code>\t<path>` line per change record
    pub fn change_text(&self) -> String {
        self.changes
            .records
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Entry warnings followed by inspection warnings
    pub fn all_warnings(&self) -> impl Iterator<Item = &ReleaseWarning> {
        self.warnings.iter().chain(self.changes.warnings.iter())
    }
}

/// Final component of the resolved path, or the path as given when it has none
pub fn directory_name(path: &Path) -> String {
    let resolved = path.canonicalize().ok();
    resolved
        .as_deref()
        .and_then(Path::file_name)
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// What happened during one confirmed commit cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepReport {
    pub path: PathBuf,
    pub display_name: String,
    /// `(from, to)` when the manifest was rewritten
    pub bumped: Option<(VersionNumber, VersionNumber)>,
    pub commit_output: String,
    pub push_output: String,
    pub warnings: Vec<ReleaseWarning>,
}

impl StepReport {
    /// No step reported a problem
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Operator-driven release loop: bump, stage, commit, push, advance
pub struct ReleaseWorkflow<V: Vcs> {
    vcs: V,
    settings: WorkflowSettings,
    worklist: Vec<RepositoryEntry>,
    cursor: usize,
    state: WorkflowState,
    increment: Increment,
    commit_message: String,
}

impl<V: Vcs> ReleaseWorkflow<V> {
    /// Create an idle workflow
    pub fn new(vcs: V, settings: WorkflowSettings) -> Self {
        let increment = settings.default_increment;
        let commit_message = settings.default_commit_message.clone();
        ReleaseWorkflow {
            vcs,
            settings,
            worklist: Vec::new(),
            cursor: 0,
            state: WorkflowState::Idle,
            increment,
            commit_message,
        }
    }

    /// Load `worklist` and set up its first entry.
    ///
    /// Allowed from any state except `AwaitingDecision`; a finished or
    /// closed run can be replaced by a new one.
    pub fn start(&mut self, worklist: Vec<PathBuf>) -> Result<()> {
        if self.state == WorkflowState::AwaitingDecision {
            return Err(ReleaseError::invalid_state(
                "a run is already in progress",
            ));
        }
        if worklist.is_empty() {
            return Err(ReleaseError::EmptyWorklist);
        }

        info!(entries = worklist.len(), "starting release run");
        self.worklist = worklist.into_iter().map(RepositoryEntry::new).collect();
        self.cursor = 0;
        self.enter_current();
        Ok(())
    }

    /// Bump, stage, commit and push the current entry, then advance.
    ///
    /// Failing steps are recorded on the report and the remaining steps still
    /// run; the workflow advances regardless. A manifest bump is not rolled
    /// back when a later step fails.
    pub fn confirm(&mut self, commit_message: &str) -> Result<StepReport> {
        self.ensure_awaiting("confirm")?;

        let entry = &self.worklist[self.cursor];
        let mut report = StepReport {
            path: entry.path.clone(),
            display_name: entry.display_name.clone(),
            ..StepReport::default()
        };

        if let (Some(manifest), Some(from), Some(to)) =
            (&entry.manifest, entry.current_version, entry.next_version)
        {
            match manifest.bump_version(&self.settings.manifest_keys.version, &from, &to) {
                Ok(()) => {
                    info!(path = %entry.path.display(), %from, %to, "bumped manifest version");
                    report.bumped = Some((from, to));
                }
                Err(e) => {
                    warn!(path = %manifest.path.display(), "version bump failed: {}", e);
                    report.warnings.push(ReleaseWarning::ManifestIo {
                        path: manifest.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let path = entry.path.clone();
        run_step(&mut report.warnings, "add", self.vcs.stage_all(&path));
        report.commit_output = run_step(
            &mut report.warnings,
            "commit",
            self.vcs.commit(&path, commit_message),
        );
        report.push_output = run_step(&mut report.warnings, "push", self.vcs.push(&path));

        self.advance();
        Ok(report)
    }

    /// Move past the current entry without committing it
    pub fn skip(&mut self) -> Result<()> {
        self.ensure_awaiting("skip")?;
        info!(path = %self.worklist[self.cursor].path.display(), "skipped");
        self.advance();
        Ok(())
    }

    /// Stop the run; the operator closed the session
    pub fn close(&mut self) {
        info!(cursor = self.cursor, "release run closed");
        self.state = WorkflowState::Closed;
    }

    /// Re-inspect the current entry, keeping the chosen increment and message
    pub fn refresh(&mut self) -> Result<()> {
        self.ensure_awaiting("refresh")?;
        let path = self.worklist[self.cursor].path.clone();
        self.worklist[self.cursor] =
            RepositoryEntry::load(path, &self.vcs, &self.settings, self.increment);
        Ok(())
    }

    /// Choose the increment and recompute the proposed version
    pub fn select_increment(&mut self, increment: Increment) {
        self.increment = increment;
        if let Some(entry) = self.current_mut() {
            entry.propose(increment);
        }
    }

    pub fn set_commit_message(&mut self, message: impl Into<String>) {
        self.commit_message = message.into();
    }

    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    pub fn increment(&self) -> Increment {
        self.increment
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.worklist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.worklist.is_empty()
    }

    pub fn entries(&self) -> &[RepositoryEntry] {
        &self.worklist
    }

    pub fn vcs(&self) -> &V {
        &self.vcs
    }

    /// Entry awaiting a decision, if any
    pub fn current(&self) -> Option<&RepositoryEntry> {
        match self.state {
            WorkflowState::AwaitingDecision => self.worklist.get(self.cursor),
            _ => None,
        }
    }

    fn current_mut(&mut self) -> Option<&mut RepositoryEntry> {
        match self.state {
            WorkflowState::AwaitingDecision => self.worklist.get_mut(self.cursor),
            _ => None,
        }
    }

    fn ensure_awaiting(&self, action: &str) -> Result<()> {
        if self.state == WorkflowState::AwaitingDecision {
            Ok(())
        } else {
            Err(ReleaseError::invalid_state(format!(
                "cannot {} while {:?}",
                action, self.state
            )))
        }
    }

    fn advance(&mut self) {
        if self.cursor + 1 >= self.worklist.len() {
            info!("release run complete");
            self.state = WorkflowState::Complete;
            return;
        }
        self.cursor += 1;
        self.enter_current();
    }

    /// Reset operator choices and load the entry under the cursor
    fn enter_current(&mut self) {
        self.increment = self.settings.default_increment;
        self.commit_message = self.settings.default_commit_message.clone();

        let path = self.worklist[self.cursor].path.clone();
        info!(
            position = self.cursor + 1,
            total = self.worklist.len(),
            path = %path.display(),
            "next repository"
        );
        self.worklist[self.cursor] =
            RepositoryEntry::load(path, &self.vcs, &self.settings, self.increment);
        self.state = WorkflowState::AwaitingDecision;
    }
}

/// Record a tool problem for `step` and return its trimmed stdout
fn run_step(warnings: &mut Vec<ReleaseWarning>, step: &str, result: Result<ToolOutput>) -> String {
    match result {
        Ok(output) => {
            if let Some(problem) = output.problem() {
                if output.success() {
                    // git reports progress (e.g. push) on stderr
                    tracing::debug!("git {}: {}", step, problem);
                } else {
                    warn!("git {} failed: {}", step, problem);
                    warnings.push(ReleaseWarning::tool(step, problem));
                }
            }
            output.stdout.trim().to_string()
        }
        Err(e) => {
            warn!("git {} failed: {}", step, e);
            warnings.push(ReleaseWarning::tool(step, e.to_string()));
            String::new()
        }
    }
}
