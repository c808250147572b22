//! Main workflow orchestration logic
//!
//! Connects the scanner, the inspector and the release workflow to an
//! operator. Argument parsing stays in `main.rs`; decisions come from an
//! [Operator] so the session can run against the terminal or a script.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{save_config, Config};
use crate::git::{GitCli, Vcs};
use crate::inspector::ChangeSetInspector;
use crate::scanner::{RepositoryScanner, ScanReport};
use crate::ui::{self, Action};
use crate::workflow::{ReleaseWorkflow, RepositoryEntry, WorkflowSettings, WorkflowState};

/// Arguments for a release session
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionArgs {
    /// Directory to scan; falls back to the configured root
    pub root: Option<PathBuf>,

    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Only print the scan overview
    pub list: bool,

    /// Persist the root path to the configuration file
    pub remember: bool,

    /// Start the run without asking
    pub yes: bool,
}

/// Counts reported at the end of a session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub scanned: usize,
    pub pending: usize,
    pub committed: usize,
    pub skipped: usize,
    /// Whether the operator quit before the worklist was finished
    pub closed: bool,
}

/// Source of operator decisions
pub trait Operator {
    /// Decide what to do with `entry`
    fn choose_action(&mut self, entry: &RepositoryEntry) -> Result<Action>;

    /// Final commit message, given the current default
    fn commit_message(&mut self, default: &str) -> Result<String>;
}

/// Operator answering through terminal prompts
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn choose_action(&mut self, entry: &RepositoryEntry) -> Result<Action> {
        ui::prompt_action(entry.current_version.is_some())
    }

    fn commit_message(&mut self, default: &str) -> Result<String> {
        ui::prompt_commit_message(default)
    }
}

/// Scan results narrowed to the repositories with pending changes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Discovery {
    pub scan: ScanReport,
    pub pending: Vec<PathBuf>,
}

/// Scan `root` and keep the working trees that have pending changes
pub fn discover<V: Vcs + ?Sized>(
    root: &Path,
    config: &Config,
    vcs: &V,
) -> crate::Result<Discovery> {
    let scan = RepositoryScanner::new(config.scan.marker.clone()).scan(root)?;
    let pending = ChangeSetInspector::new(vcs, &config.scan.ignored_suffixes)
        .untracked_as(config.scan.untracked_status())
        .pending(&scan.repositories);

    info!(
        root = %root.display(),
        total = scan.repositories.len(),
        pending = pending.len(),
        "scan finished"
    );
    Ok(Discovery { scan, pending })
}

/// Drive `workflow` until it completes or the operator quits
pub fn drive<V: Vcs, O: Operator>(
    workflow: &mut ReleaseWorkflow<V>,
    operator: &mut O,
) -> Result<SessionSummary> {
    let mut summary = SessionSummary {
        pending: workflow.len(),
        ..SessionSummary::default()
    };

    while workflow.state() == WorkflowState::AwaitingDecision {
        let Some(entry) = workflow.current() else {
            break;
        };
        ui::display_entry(entry, workflow.cursor() + 1, workflow.len(), workflow.increment());

        match operator.choose_action(entry)? {
            Action::SelectIncrement(increment) => workflow.select_increment(increment),
            Action::Skip => {
                workflow.skip()?;
                summary.skipped += 1;
            }
            Action::Quit => workflow.close(),
            Action::Commit => {
                let message = operator.commit_message(workflow.commit_message())?;
                workflow.set_commit_message(message.clone());
                let report = workflow.confirm(&message)?;
                ui::display_step_report(&report);
                summary.committed += 1;
            }
        }
    }

    summary.closed = workflow.state() == WorkflowState::Closed;
    Ok(summary)
}

/// Full interactive session: resolve root, scan, inspect, run the workflow
pub fn run_session(args: SessionArgs, mut config: Config) -> Result<SessionSummary> {
    let root = args
        .root
        .clone()
        .or_else(|| config.root.clone())
        .context("No root path given: pass --root or set `root` in gitrelease.toml")?;

    if args.remember {
        config.root = Some(root.clone());
        let saved = save_config(&config, args.config_path.as_deref())
            .context("Failed to save configuration")?;
        ui::display_success(&format!("Remembered root path in {}", saved.display()));
    }

    let vcs = GitCli::with_executable(config.git.executable.clone());
    let discovery = discover(&root, &config, &vcs)?;

    for warning in &discovery.scan.warnings {
        ui::display_warning(warning);
    }
    ui::display_scan_overview(
        &root,
        discovery.scan.repositories.len(),
        discovery.pending.len(),
    );

    let mut summary = SessionSummary {
        scanned: discovery.scan.repositories.len(),
        pending: discovery.pending.len(),
        ..SessionSummary::default()
    };

    if args.list {
        let listing: Vec<(PathBuf, bool)> = discovery
            .scan
            .repositories
            .iter()
            .map(|path| (path.clone(), discovery.pending.contains(path)))
            .collect();
        ui::display_repository_list(&listing);
        return Ok(summary);
    }

    if discovery.pending.is_empty() {
        ui::display_success("Nothing to commit, all working trees clean");
        return Ok(summary);
    }

    if !args.yes
        && !ui::confirm_action(&format!(
            "Start release run for {} repositories?",
            discovery.pending.len()
        ))?
    {
        println!("Operation cancelled by user.");
        return Ok(summary);
    }

    let mut workflow = ReleaseWorkflow::new(vcs, WorkflowSettings::from(&config));
    workflow.start(discovery.pending)?;
    let run = drive(&mut workflow, &mut TerminalOperator)?;

    summary.committed = run.committed;
    summary.skipped = run.skipped;
    summary.closed = run.closed;

    if summary.closed {
        ui::display_status(&format!(
            "Closed after {} of {} repositories",
            summary.committed + summary.skipped,
            summary.pending
        ));
    } else {
        ui::display_success(&format!(
            "Done: {} committed, {} skipped",
            summary.committed, summary.skipped
        ));
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockVcs;
    use std::collections::VecDeque;

    struct Scripted {
        actions: VecDeque<Action>,
        messages: VecDeque<String>,
    }

    impl Operator for Scripted {
        fn choose_action(&mut self, _entry: &RepositoryEntry) -> Result<Action> {
            Ok(self.actions.pop_front().unwrap_or(Action::Quit))
        }

        fn commit_message(&mut self, default: &str) -> Result<String> {
            Ok(self
                .messages
                .pop_front()
                .unwrap_or_else(|| default.to_string()))
        }
    }

    fn workflow(paths: &[&str]) -> ReleaseWorkflow<MockVcs> {
        let mut wf = ReleaseWorkflow::new(MockVcs::new(), WorkflowSettings::default());
        wf.start(paths.iter().map(PathBuf::from).collect()).unwrap();
        wf
    }

    #[test]
    fn test_drive_commit_and_skip() {
        let mut wf = workflow(&["/a", "/b", "/c"]);
        let mut operator = Scripted {
            actions: VecDeque::from(vec![Action::Commit, Action::Skip, Action::Commit]),
            messages: VecDeque::from(vec!["first".to_string()]),
        };

        let summary = drive(&mut wf, &mut operator).unwrap();
        assert_eq!(summary.committed, 2);
        assert_eq!(summary.skipped, 1);
        assert!(!summary.closed);
        assert_eq!(wf.state(), WorkflowState::Complete);

        assert!(wf
            .vcs()
            .calls_in(Path::new("/a"))
            .contains(&"commit -m first".to_string()));
        assert!(wf
            .vcs()
            .calls_in(Path::new("/c"))
            .contains(&"commit -m fixes".to_string()));
    }

    #[test]
    fn test_drive_quit_closes() {
        let mut wf = workflow(&["/a", "/b"]);
        let mut operator = Scripted {
            actions: VecDeque::from(vec![Action::Skip, Action::Quit]),
            messages: VecDeque::new(),
        };

        let summary = drive(&mut wf, &mut operator).unwrap();
        assert!(summary.closed);
        assert_eq!(summary.skipped, 1);
        assert_eq!(wf.state(), WorkflowState::Closed);
    }

    #[test]
    fn test_drive_increment_selection_keeps_entry() {
        let mut wf = workflow(&["/a"]);
        let mut operator = Scripted {
            actions: VecDeque::from(vec![
                Action::SelectIncrement(crate::domain::version::Increment::Patch),
                Action::Skip,
            ]),
            messages: VecDeque::new(),
        };

        let summary = drive(&mut wf, &mut operator).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.committed, 0);
    }

    #[test]
    fn test_run_session_requires_root() {
        let result = run_session(SessionArgs::default(), Config::default());
        assert!(result.unwrap_err().to_string().contains("No root path"));
    }
}
