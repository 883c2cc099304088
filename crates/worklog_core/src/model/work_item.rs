//! Work item model.

use serde::{Deserialize, Serialize};

/// One checkbox line of a daily note.
///
/// Items have no identity beyond their position in the owning list. Text is
/// kept on a single trimmed line, so every item survives a write/read cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Free-form task text, never blank after trimming.
    pub text: String,
    /// `true` for `- [x]` lines.
    pub completed: bool,
}

impl WorkItem {
    /// Creates an unchecked item.
    pub fn pending(text: impl AsRef<str>) -> Self {
        Self {
            text: single_line(text.as_ref()),
            completed: false,
        }
    }

    /// Creates a checked item.
    pub fn done(text: impl AsRef<str>) -> Self {
        Self {
            text: single_line(text.as_ref()),
            completed: true,
        }
    }

    /// `true` when the text has nothing left after trimming.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Collapses free text onto one line: lines are trimmed, blank lines dropped
/// and the rest joined with single spaces.
pub fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
