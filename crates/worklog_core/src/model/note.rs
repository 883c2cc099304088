//! Daily note model.
//!
//! # Responsibility
//! - Hold frontmatter, summary fields and both work-item lists of one day.
//! - Provide the item mutation API used by reconciliation and callers.
//!
//! # Invariants
//! - `id` has the shape `<Workplace>-<day>-<Mon>-<year>` for fresh notes.
//! - Fresh notes are tagged with the lowercased workplace name and `job`.
//! - Index-based mutations ignore out-of-range indices.
//!
//! # See also
//! - crates/worklog_core/src/service/reconcile.rs

use crate::model::work_item::WorkItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Date format used in frontmatter, titles and file names.
pub const NOTE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Tag attached to every freshly created note.
pub const JOB_TAG: &str = "job";

const NOTE_ID_DATE_FORMAT: &str = "%-d-%b-%Y";

/// One daily work-log note bound to a workplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Derived identifier, e.g. `Acme-19-Jan-2025`.
    pub id: String,
    /// Reserved frontmatter list; always empty for notes created here.
    pub aliases: Vec<String>,
    /// Tag set in insertion order.
    pub tags: Vec<String>,
    /// Calendar day of the note. `None` when frontmatter carried no valid date.
    pub date: Option<NaiveDate>,
    pub title: String,
    /// Recap of this day, filled in retroactively by the next day's start.
    pub summary: String,
    /// Recap of the previous note, filled in when this note is created.
    pub yesterday_summary: String,
    pub pending_work: Vec<WorkItem>,
    pub completed_work: Vec<WorkItem>,
    /// Backing markdown file. Empty until the note is written or parsed.
    pub file_path: PathBuf,
}

impl Note {
    /// Creates a fresh note for `date` in `workplace`.
    pub fn new(date: NaiveDate, workplace: &str) -> Self {
        Self {
            id: note_id(date, workplace),
            aliases: Vec::new(),
            tags: vec![workplace_tag(workplace), JOB_TAG.to_string()],
            date: Some(date),
            title: date.format(NOTE_DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    pub fn has_pending_work(&self) -> bool {
        !self.pending_work.is_empty()
    }

    pub fn has_completed_work(&self) -> bool {
        !self.completed_work.is_empty()
    }

    /// Appends an unchecked item. Blank text is refused and returns `false`.
    pub fn add_pending_item(&mut self, text: impl AsRef<str>) -> bool {
        push_item(&mut self.pending_work, WorkItem::pending(text))
    }

    /// Appends a checked item. Blank text is refused and returns `false`.
    pub fn add_completed_item(&mut self, text: impl AsRef<str>) -> bool {
        push_item(&mut self.completed_work, WorkItem::done(text))
    }

    /// Moves `pending_work[index]` to the end of `completed_work`.
    ///
    /// Returns `false` and leaves the note untouched when `index` is out of range.
    pub fn mark_item_completed(&mut self, index: usize) -> bool {
        if index >= self.pending_work.len() {
            return false;
        }
        let mut item = self.pending_work.remove(index);
        item.completed = true;
        self.completed_work.push(item);
        true
    }

    /// Removes one pending item. Out-of-range indices are ignored.
    pub fn remove_pending_item(&mut self, index: usize) -> Option<WorkItem> {
        (index < self.pending_work.len()).then(|| self.pending_work.remove(index))
    }

    /// Removes one completed item. Out-of-range indices are ignored.
    pub fn remove_completed_item(&mut self, index: usize) -> Option<WorkItem> {
        (index < self.completed_work.len()).then(|| self.completed_work.remove(index))
    }

    /// Adds `tag` unless an identical tag is already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}

fn push_item(items: &mut Vec<WorkItem>, item: WorkItem) -> bool {
    if item.is_blank() {
        return false;
    }
    items.push(item);
    true
}

/// Builds the note id for `(date, workplace)`, e.g. `Acme-19-Jan-2025`.
pub fn note_id(date: NaiveDate, workplace: &str) -> String {
    format!("{workplace}-{}", date.format(NOTE_ID_DATE_FORMAT))
}

/// Builds the canonical file name, e.g. `2025-01-19-Acme.md`.
pub fn note_filename(date: NaiveDate, workplace: &str) -> String {
    format!("{}-{workplace}.md", date.format(NOTE_DATE_FORMAT))
}

/// Tag form of a workplace name.
pub fn workplace_tag(workplace: &str) -> String {
    workplace.to_lowercase()
}
