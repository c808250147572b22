//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Line builders return strings so they can be tested; `display_*` functions print them.

use std::path::{Path, PathBuf};

use console::style;

use crate::domain::version::Increment;
use crate::warning::ReleaseWarning;
use crate::workflow::{RepositoryEntry, StepReport};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print a non-fatal warning next to the entry it belongs to.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Counts shown before a run starts.
pub fn display_scan_overview(root: &Path, total: usize, with_changes: usize) {
    println!("\n{}", style(format!("Path: {}", root.display())).bold());
    println!("  Total repositories: {}", total);
    println!("  With changes:       {}", with_changes);
}

/// One line per scanned repository, dirty ones highlighted.
pub fn display_repository_list(repositories: &[(PathBuf, bool)]) {
    for (path, dirty) in repositories {
        if *dirty {
            println!("  {} {}", style("*").yellow(), path.display());
        } else {
            println!("    {}", style(path.display()).dim());
        }
    }
}

/// `Major / [Minor] / Patch` with the selected increment bracketed.
pub fn increment_bar(selected: Increment) -> String {
    Increment::ALL
        .iter()
        .enumerate()
        .map(|(i, inc)| {
            if *inc == selected {
                format!("[{}:{}]", i + 1, inc)
            } else {
                format!(" {}:{} ", i + 1, inc)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header and details of the entry awaiting a decision.
pub fn entry_lines(entry: &RepositoryEntry, position: usize, total: usize) -> Vec<String> {
    let mut lines = vec![
        format!("[{}/{}] {}", position, total, entry.path.display()),
        format!("  Name:            {}", entry.display_name),
        format!("  Branch:          {}", entry.branch_name()),
    ];

    if let (Some(current), Some(next)) = (entry.current_version, entry.next_version) {
        lines.push(format!("  Current Version: {}", current));
        lines.push(format!("  Next Version:    {}", next));
    }

    if !entry.changes.summary.is_empty() {
        lines.push(format!("  {}", entry.changes.summary));
    }

    lines
}

/// Print the entry, its change list and any warnings attached to it.
pub fn display_entry(entry: &RepositoryEntry, position: usize, total: usize, increment: Increment) {
    let mut lines = entry_lines(entry, position, total).into_iter();
    if let Some(header) = lines.next() {
        println!("\n{}", style(header).bold());
    }
    for line in lines {
        println!("{}", line);
    }

    if entry.current_version.is_some() {
        println!("  Increment:       {}", increment_bar(increment));
    }

    let changes = entry.change_text();
    if !changes.is_empty() {
        println!("\n{}", style("Changes:").underlined());
        for line in changes.lines() {
            println!("  {}", line);
        }
    }

    for warning in entry.all_warnings() {
        display_warning(warning);
    }
}

/// Outcome of a commit cycle: version change, push output, warnings.
pub fn display_step_report(report: &StepReport) {
    if let Some((from, to)) = &report.bumped {
        display_success(&format!(
            "{}: version {} → {}",
            report.display_name, from, to
        ));
    }

    if !report.push_output.is_empty() {
        println!("{}", style(&report.push_output).dim());
    }

    for warning in &report.warnings {
        display_warning(warning);
    }

    if report.is_clean() {
        display_success(&format!("Committed and pushed {}", report.display_name));
    }
}
