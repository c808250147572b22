use regex::Regex;
use std::fmt;

/// Classification of a single pending change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Untracked,
}

impl ChangeStatus {
    /// Classify a two-character porcelain status code (`XY`).
    ///
    /// `untracked` is the classification used for `??` entries.
    pub fn from_code(code: &str, untracked: ChangeStatus) -> Self {
        if code == "??" {
            return untracked;
        }
        if code.contains('D') {
            ChangeStatus::Deleted
        } else if code.contains('A') {
            ChangeStatus::Added
        } else {
            ChangeStatus::Modified
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeStatus::Added => "Added",
            ChangeStatus::Modified => "Modified",
            ChangeStatus::Deleted => "Deleted",
            ChangeStatus::Untracked => "Untracked",
        };
        f.write_str(label)
    }
}

/// One changed file in a working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub status: ChangeStatus,
    /// Raw porcelain code, kept for display
    pub code: String,
    /// Path relative to the repository root
    pub path: String,
}

impl ChangeRecord {
    /// Parse one line of `status --porcelain` output.
    ///
    /// Lines are `XY <path>`; renames and copies (`XY <old> -> <new>`) report the
    /// new path. Returns `None` for blank or truncated lines.
    pub fn parse_porcelain(line: &str, untracked: ChangeStatus) -> Option<Self> {
        let line = line.trim_end_matches('\r');
        if line.len() < 4 || !line.is_char_boundary(2) || !line.is_char_boundary(3) {
            return None;
        }

        let (code, rest) = line.split_at(2);
        let raw_path = rest[1..].trim();
        let raw_path = match raw_path.rsplit_once(" -> ") {
            Some((_, new_path)) => new_path,
            None => raw_path,
        };
        let path = raw_path.trim_matches('"');
        if path.is_empty() {
            return None;
        }

        Some(ChangeRecord {
            status: ChangeStatus::from_code(code, untracked),
            code: code.to_string(),
            path: path.to_string(),
        })
    }

    /// Whether the path ends in one of the ignored sidecar suffixes
    pub fn is_sidecar(&self, ignored_suffixes: &[String]) -> bool {
        ignored_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && self.path.ends_with(suffix.as_str()))
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.code, self.path)
    }
}

/// Numbers from a `diff --shortstat` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffSummary {
    pub files_changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

impl DiffSummary {
    /// Parse e.g. ` 3 files changed, 10 insertions(+), 2 deletions(-)`.
    ///
    /// Either of the insertion/deletion parts may be missing. Returns `None`
    /// when the line carries no file count.
    pub fn parse(line: &str) -> Option<Self> {
        let files = Regex::new(r"(\d+) files? changed").ok()?;
        let insertions = Regex::new(r"(\d+) insertions?\(\+\)").ok()?;
        let deletions = Regex::new(r"(\d+) deletions?\(-\)").ok()?;

        let count =
            |re: &Regex| -> Option<u32> { re.captures(line)?.get(1)?.as_str().parse().ok() };

        Some(DiffSummary {
            files_changed: count(&files)?,
            insertions: count(&insertions).unwrap_or(0),
            deletions: count(&deletions).unwrap_or(0),
        })
    }
}
