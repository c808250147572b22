//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Interactive prompts and user input handling

use std::io::{self, Write};

use anyhow::Result;

use crate::domain::version::Increment;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_entry, display_error, display_repository_list, display_scan_overview,
    display_status, display_step_report, display_success, display_warning,
};

/// An operator decision on the entry being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Add, commit and push
    Commit,
    Skip,
    SelectIncrement(Increment),
    Quit,
}

/// Parse an action key.
///
/// `c` commits (also the default on empty input), `s` skips, `1`-`3` pick
/// Major/Minor/Patch and `q` quits. Returns `None` for anything else.
pub fn parse_action(input: &str) -> Option<Action> {
    match input.trim().to_lowercase().as_str() {
        "" | "c" | "commit" => Some(Action::Commit),
        "s" | "skip" => Some(Action::Skip),
        "q" | "quit" => Some(Action::Quit),
        "1" | "major" => Some(Action::SelectIncrement(Increment::Major)),
        "2" | "minor" => Some(Action::SelectIncrement(Increment::Minor)),
        "3" | "patch" => Some(Action::SelectIncrement(Increment::Patch)),
        _ => None,
    }
}

/// Prompts for the next action until a valid key is entered.
///
/// Increment keys are only offered when the entry has a version to bump.
pub fn prompt_action(can_bump: bool) -> Result<Action> {
    let keys = if can_bump {
        "[c]ommit & push, [s]kip, [1/2/3] major/minor/patch, [q]uit"
    } else {
        "[c]ommit & push, [s]kip, [q]uit"
    };

    loop {
        print!("\n{} [default: c]: ", keys);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(Action::Quit);
        }

        match parse_action(&input) {
            Some(Action::SelectIncrement(_)) if !can_bump => {
                display_error("This repository has no manifest version to bump");
            }
            Some(action) => return Ok(action),
            None => display_error(&format!("Unknown action '{}'", input.trim())),
        }
    }
}

/// Prompts for the commit message, keeping `default` on empty input.
pub fn prompt_commit_message(default: &str) -> Result<String> {
    print!("Commit message [default: {}]: ", default);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(message_or_default(&input, default))
}

fn message_or_default(input: &str, default: &str) -> String {
    let message = input.trim();
    if message.is_empty() {
        default.to_string()
    } else {
        message.to_string()
    }
}

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Displays the given prompt and accepts "y" or "yes" (case-insensitive) as confirmation.
/// Default is "no" if user presses Enter.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    print!("\n{} (y/N): ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let response = input.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_keys() {
        assert_eq!(parse_action("c\n"), Some(Action::Commit));
        assert_eq!(parse_action(""), Some(Action::Commit));
        assert_eq!(parse_action("S"), Some(Action::Skip));
        assert_eq!(parse_action("q"), Some(Action::Quit));
        assert_eq!(
            parse_action("1"),
            Some(Action::SelectIncrement(Increment::Major))
        );
        assert_eq!(
            parse_action(" patch "),
            Some(Action::SelectIncrement(Increment::Patch))
        );
    }

    #[test]
    fn test_parse_action_unknown() {
        assert_eq!(parse_action("x"), None);
        assert_eq!(parse_action("4"), None);
    }

    #[test]
    fn test_message_or_default() {
        assert_eq!(message_or_default("\n", "fixes"), "fixes");
        assert_eq!(message_or_default("  add grid snapping \n", "fixes"), "add grid snapping");
    }
}
