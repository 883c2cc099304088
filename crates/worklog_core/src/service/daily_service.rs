//! Daily workflow service.
//!
//! # Responsibility
//! - Provide the start/add/done/review/delete/summarize use-cases for one
//!   workplace on top of a [`NoteRepository`].
//! - Persist both notes after reconciliation.
//!
//! # Invariants
//! - Item indices are zero-based and refer to the list as last read.
//! - Multi-index mutations run from the highest index down.
//! - Summary failures are warnings in `start` and hard errors in
//!   `summarize_today`.

use crate::model::note::Note;
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::service::reconcile::{reconcile, request_summary, SummaryOutcome};
use crate::summarizer::{Summarizer, SummarizerError};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Service error for daily workflows.
#[derive(Debug)]
pub enum WorkflowError {
    Repo(RepoError),
    Summary(SummarizerError),
    /// A summary was requested but no backend is configured.
    SummarizerUnavailable,
}

impl Display for WorkflowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Summary(err) => write!(f, "{err}"),
            Self::SummarizerUnavailable => write!(f, "no summary backend configured"),
        }
    }
}

impl Error for WorkflowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Summary(err) => Some(err),
            Self::SummarizerUnavailable => None,
        }
    }
}

impl From<RepoError> for WorkflowError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SummarizerError> for WorkflowError {
    fn from(value: SummarizerError) -> Self {
        Self::Summary(value)
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Report of one `start` run.
#[derive(Debug)]
pub struct StartReport {
    /// `true` when today's note did not exist before this run.
    pub created_today: bool,
    /// File of the reconciled previous note, if one was found.
    pub previous_file: Option<PathBuf>,
    pub newly_completed: usize,
    pub carried_forward: usize,
    pub summary: SummaryOutcome,
    /// Today's note as written.
    pub today: Note,
}

/// Report of one `review` run.
#[derive(Debug)]
pub struct ReviewReport {
    pub note: Note,
    pub newly_completed: usize,
}

/// Result of a standalone summary of today's completed work.
#[derive(Debug, PartialEq, Eq)]
pub enum TodaySummary {
    NoNote,
    NothingCompleted,
    Generated(String),
}

/// Daily workflow facade over one workplace repository.
pub struct DailyService<R: NoteRepository> {
    repo: R,
    summarizer: Option<Box<dyn Summarizer>>,
}

impl<R: NoteRepository> DailyService<R> {
    /// Creates a service without a summary backend.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            summarizer: None,
        }
    }

    /// Attaches a summary backend.
    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns the note whose pending items `start`/`review` would process.
    pub fn previous_note(&self, today: NaiveDate) -> WorkflowResult<Option<Note>> {
        Ok(self.repo.find_most_recent_before(today)?)
    }

    /// Returns today's note when it exists.
    pub fn today_note(&self, today: NaiveDate) -> WorkflowResult<Option<Note>> {
        Ok(self.repo.find_by_date(today)?)
    }

    fn today_or_fresh(&self, today: NaiveDate) -> WorkflowResult<(Note, bool)> {
        Ok(match self.repo.find_by_date(today)? {
            Some(note) => (note, false),
            None => (self.repo.create_today_note(today), true),
        })
    }

    /// Runs the daily start: find-or-create today's note, reconcile it with
    /// the most recent earlier note, then write the previous note and today's.
    pub async fn start(&self, today: NaiveDate, verdicts: &[bool]) -> WorkflowResult<StartReport> {
        let (today_note, created_today) = self.today_or_fresh(today)?;
        let previous = self.repo.find_most_recent_before(today)?;

        let mut outcome =
            reconcile(previous, today_note, verdicts, self.summarizer.as_deref()).await;

        let previous_file = match outcome.previous.as_mut() {
            Some(previous) => {
                self.repo.write_note(previous)?;
                Some(previous.file_path.clone())
            }
            None => None,
        };
        self.repo.write_note(&mut outcome.today)?;

        info!(
            "event=daily_start module=service status=ok workplace={} created_today={} completed={} carried={}",
            self.repo.workplace(),
            created_today,
            outcome.newly_completed,
            outcome.carried_forward
        );

        Ok(StartReport {
            created_today,
            previous_file,
            newly_completed: outcome.newly_completed,
            carried_forward: outcome.carried_forward,
            summary: outcome.summary,
            today: outcome.today,
        })
    }

    /// Appends pending items to today's note, creating it when needed.
    ///
    /// Blank texts are skipped. The note is only written when something was added.
    pub fn add_items<I, S>(&self, today: NaiveDate, texts: I) -> WorkflowResult<(Note, usize)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (mut note, _) = self.today_or_fresh(today)?;
        let mut added = 0;
        for text in texts {
            if note.add_pending_item(text) {
                added += 1;
            }
        }
        if added > 0 {
            self.repo.write_note(&mut note)?;
        }
        Ok((note, added))
    }

    /// Marks pending items of today's note completed.
    ///
    /// Returns `None` when today's note does not exist, else the note and the
    /// number of items actually moved.
    pub fn complete_items(
        &self,
        today: NaiveDate,
        pending_indices: &[usize],
    ) -> WorkflowResult<Option<(Note, usize)>> {
        let Some(mut note) = self.repo.find_by_date(today)? else {
            return Ok(None);
        };
        let mut moved = 0;
        for index in descending_unique(pending_indices) {
            if note.mark_item_completed(index) {
                moved += 1;
            }
        }
        if moved > 0 {
            self.repo.write_note(&mut note)?;
        }
        Ok(Some((note, moved)))
    }

    /// Removes items from today's note.
    pub fn remove_items(
        &self,
        today: NaiveDate,
        pending_indices: &[usize],
        completed_indices: &[usize],
    ) -> WorkflowResult<Option<(Note, usize)>> {
        let Some(mut note) = self.repo.find_by_date(today)? else {
            return Ok(None);
        };
        let mut removed = 0;
        for index in descending_unique(pending_indices) {
            removed += usize::from(note.remove_pending_item(index).is_some());
        }
        for index in descending_unique(completed_indices) {
            removed += usize::from(note.remove_completed_item(index).is_some());
        }
        if removed > 0 {
            self.repo.write_note(&mut note)?;
        }
        Ok(Some((note, removed)))
    }

    /// Deletes today's note file. Returns `false` when none existed.
    pub fn delete_today(&self, today: NaiveDate) -> WorkflowResult<bool> {
        Ok(self.repo.delete_note(today)?)
    }

    /// Marks items of the most recent earlier note completed in place.
    ///
    /// Unlike `start`, nothing is carried forward and no summary is requested.
    pub fn review(
        &self,
        today: NaiveDate,
        verdicts: &[bool],
    ) -> WorkflowResult<Option<ReviewReport>> {
        let Some(mut note) = self.repo.find_most_recent_before(today)? else {
            return Ok(None);
        };

        let pending = std::mem::take(&mut note.pending_work);
        let mut newly_completed = 0;
        for (index, item) in pending.into_iter().enumerate() {
            if verdicts.get(index).copied().unwrap_or(false) {
                note.add_completed_item(item.text);
                newly_completed += 1;
            } else {
                note.pending_work.push(item);
            }
        }

        if newly_completed > 0 {
            self.repo.write_note(&mut note)?;
        }
        Ok(Some(ReviewReport {
            note,
            newly_completed,
        }))
    }

    /// Summarizes today's completed work. Backend failures are errors here.
    pub async fn summarize_today(&self, today: NaiveDate) -> WorkflowResult<TodaySummary> {
        let Some(note) = self.repo.find_by_date(today)? else {
            return Ok(TodaySummary::NoNote);
        };
        if !note.has_completed_work() {
            return Ok(TodaySummary::NothingCompleted);
        }
        let summarizer = self
            .summarizer
            .as_deref()
            .ok_or(WorkflowError::SummarizerUnavailable)?;
        let text = request_summary(summarizer, &note.completed_work).await?;
        Ok(TodaySummary::Generated(text))
    }
}

fn descending_unique(indices: &[usize]) -> Vec<usize> {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();
    sorted
}
