//! Pending-change inspection of a single working tree.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::change::{ChangeRecord, ChangeStatus, DiffSummary};
use crate::git::Vcs;
use crate::warning::ReleaseWarning;

/// Pending changes of one working tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Changed files, sidecar files excluded
    pub records: Vec<ChangeRecord>,
    /// Last line of the shortstat output, for display
    pub summary: String,
    pub stats: Option<DiffSummary>,
    pub warnings: Vec<ReleaseWarning>,
}

impl ChangeSet {
    pub fn has_changes(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Runs status queries through a [Vcs] and builds [ChangeSet]s
pub struct ChangeSetInspector<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    ignored_suffixes: &'a [String],
    untracked: ChangeStatus,
}

impl<'a, V: Vcs + ?Sized> ChangeSetInspector<'a, V> {
    pub fn new(vcs: &'a V, ignored_suffixes: &'a [String]) -> Self {
        ChangeSetInspector {
            vcs,
            ignored_suffixes,
            untracked: ChangeStatus::Added,
        }
    }

    /// Classify `??` entries as `status` instead of `Added`
    pub fn untracked_as(mut self, status: ChangeStatus) -> Self {
        self.untracked = status;
        self
    }

    /// Inspect `path`.
    ///
    /// Tool failures never abort the inspection: they become warnings and
    /// the (possibly empty) change set is still returned. Empty status output
    /// is the only signal of a clean tree.
    pub fn inspect(&self, path: &Path) -> ChangeSet {
        let mut set = ChangeSet::default();

        if let Some(output) = self.capture(path, "status", &mut set.warnings, |dir| {
            self.vcs.status_porcelain(dir)
        }) {
            set.records = output
                .lines()
                .filter_map(|line| ChangeRecord::parse_porcelain(line, self.untracked))
                .filter(|record| !record.is_sidecar(self.ignored_suffixes))
                .collect();
        }

        if !set.has_changes() {
            return set;
        }

        if let Some(output) = self.capture(path, "diff", &mut set.warnings, |dir| {
            self.vcs.diff_shortstat(dir)
        }) {
            set.summary = output
                .lines()
                .rev()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string();
            set.stats = DiffSummary::parse(&set.summary);
        }

        set
    }

    /// Keep the paths whose working trees have pending changes, in order
    pub fn pending(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        paths
            .iter()
            .filter(|path| self.inspect(path).has_changes())
            .cloned()
            .collect()
    }

    /// Run one query, turning tool problems into warnings; returns stdout
    fn capture<F>(
        &self,
        path: &Path,
        step: &str,
        warnings: &mut Vec<ReleaseWarning>,
        query: F,
    ) -> Option<String>
    where
        F: FnOnce(&Path) -> crate::error::Result<crate::git::ToolOutput>,
    {
        match query(path) {
            Ok(output) => {
                if let Some(problem) = output.problem() {
                    warn!(path = %path.display(), "git {}: {}", step, problem);
                    warnings.push(ReleaseWarning::tool(step, problem));
                }
                Some(output.stdout)
            }
            Err(e) => {
                warn!(path = %path.display(), "git {}: {}", step, e);
                warnings.push(ReleaseWarning::tool(step, e.to_string()));
                None
            }
        }
    }
}
