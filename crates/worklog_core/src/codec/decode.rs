//! Line-oriented note decoder.
//!
//! Every line is fed through [`NoteDecoder::feed`], a single transition
//! function over [`DecodeState`]. Unknown lines are skipped in every state.

use super::{
    CodecError, CodecResult, COMPLETED_HEADING, FRONTMATTER_FENCE, PENDING_HEADING,
    SUMMARY_PREFIX, YESTERDAY_SUMMARY_PREFIX,
};
use crate::model::note::{Note, NOTE_DATE_FORMAT};
use crate::model::work_item::WorkItem;
use chrono::NaiveDate;
use log::debug;
use std::path::Path;

const FRONTMATTER_LIST_PREFIX: &str = "  - ";
const UNCHECKED_PREFIX: &str = "- [ ] ";
const CHECKED_PREFIXES: [&str; 2] = ["- [x] ", "- [X] "];

/// Decoder region for the line currently being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// Between the two `---` fences.
    Frontmatter,
    /// Outside frontmatter and before any work section.
    Body,
    /// After `## Pending Work`.
    PendingSection,
    /// After `## Work Completed`.
    CompletedSection,
}

/// Stateful decoder that builds one [`Note`] from successive lines.
#[derive(Debug)]
pub struct NoteDecoder {
    state: DecodeState,
    /// Region to return to when the current frontmatter block closes.
    resume: DecodeState,
    note: Note,
}

impl Default for NoteDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteDecoder {
    pub fn new() -> Self {
        Self {
            state: DecodeState::Body,
            resume: DecodeState::Body,
            note: Note::default(),
        }
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Applies one line and returns the resulting state.
    ///
    /// Every line that is exactly `---` toggles the frontmatter region, also
    /// in the body. Closing a region resumes whatever region it interrupted.
    pub fn feed(&mut self, line: &str) -> DecodeState {
        if line == FRONTMATTER_FENCE {
            if self.state == DecodeState::Frontmatter {
                self.state = self.resume;
            } else {
                self.resume = self.state;
                self.state = DecodeState::Frontmatter;
            }
            return self.state;
        }

        if self.state == DecodeState::Frontmatter {
            self.apply_frontmatter_line(line);
            return self.state;
        }

        if let Some(title) = line.strip_prefix("# ") {
            self.note.title = title.to_string();
        } else if let Some(summary) = line.strip_prefix(SUMMARY_PREFIX) {
            self.note.summary = summary.trim().to_string();
        } else if let Some(summary) = line.strip_prefix(YESTERDAY_SUMMARY_PREFIX) {
            self.note.yesterday_summary = summary.trim().to_string();
        } else if line.starts_with(PENDING_HEADING) {
            self.state = DecodeState::PendingSection;
        } else if line.starts_with(COMPLETED_HEADING) {
            self.state = DecodeState::CompletedSection;
        } else {
            self.apply_section_line(line);
        }
        self.state
    }

    /// Consumes the decoder and returns the decoded note.
    pub fn finish(self) -> Note {
        self.note
    }

    fn apply_frontmatter_line(&mut self, line: &str) {
        if let Some(id) = line.strip_prefix("id:") {
            self.note.id = id.trim().to_string();
        } else if let Some(raw_date) = line.strip_prefix("date:") {
            let raw_date = raw_date.trim();
            match NaiveDate::parse_from_str(raw_date, NOTE_DATE_FORMAT) {
                Ok(date) => self.note.date = Some(date),
                Err(_) => {
                    debug!("event=note_decode module=codec status=skipped field=date reason=unparsable")
                }
            }
        } else if let Some(entry) = line.strip_prefix(FRONTMATTER_LIST_PREFIX) {
            // `tags:` and `aliases:` entries share this shape and both land in tags.
            self.note.add_tag(entry.trim());
        }
    }

    fn apply_section_line(&mut self, line: &str) {
        let target = match self.state {
            DecodeState::PendingSection => &mut self.note.pending_work,
            DecodeState::CompletedSection => &mut self.note.completed_work,
            DecodeState::Body | DecodeState::Frontmatter => return,
        };
        if let Some(item) = parse_checkbox(line) {
            target.push(item);
        }
    }
}

/// Parses one checkbox line (`- [ ] text`, `- [x] text`, `- [X] text`).
///
/// Leading/trailing whitespace around the line is ignored. Returns `None` for
/// any other shape, including blank item text.
pub fn parse_checkbox(line: &str) -> Option<WorkItem> {
    let line = line.trim();
    if let Some(text) = line.strip_prefix(UNCHECKED_PREFIX) {
        return non_blank(text).map(WorkItem::pending);
    }
    CHECKED_PREFIXES
        .iter()
        .find_map(|prefix| line.strip_prefix(prefix))
        .and_then(non_blank)
        .map(WorkItem::done)
}

fn non_blank(text: &str) -> Option<&str> {
    (!text.trim().is_empty()).then_some(text)
}

/// Decodes note content. Never fails; unknown lines are ignored.
pub fn parse_note(content: &str) -> Note {
    let mut decoder = NoteDecoder::new();
    for line in content.lines() {
        decoder.feed(line);
    }
    decoder.finish()
}

/// Reads and decodes a note file, recording its path on the note.
pub fn read_note(path: &Path) -> CodecResult<Note> {
    let content = std::fs::read_to_string(path).map_err(|source| CodecError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut note = parse_note(&content);
    note.file_path = path.to_path_buf();
    Ok(note)
}
