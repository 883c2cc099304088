//! Daily reconciliation engine.
//!
//! # Responsibility
//! - Split the previous note's pending items into completed and carried items.
//! - Request a narrative summary of the previous note's completed work.
//!
//! # Invariants
//! - After reconciliation the previous note has no pending items.
//! - Completed items keep their original relative order, as do carried items.
//! - Summary failures never abort reconciliation.
//! - Without a previous note, today's note is returned untouched.

use crate::model::note::Note;
use crate::model::work_item::{single_line, WorkItem};
use crate::summarizer::{Summarizer, SummarizerError};
use log::{info, warn};

/// What happened to the summary step of one reconciliation.
#[derive(Debug)]
pub enum SummaryOutcome {
    /// No previous note, or it has no completed work.
    NotRequested,
    /// Completed work exists but no summarizer was supplied.
    Skipped,
    /// Summary text stored on both notes.
    Generated(String),
    /// Backend failed; both summary fields keep their prior values.
    Failed(SummarizerError),
}

impl SummaryOutcome {
    /// Warning text for callers that surface non-fatal failures.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Failed(err) if err.is_connection_failure() => {
                Some(format!("could not connect to summary backend: {err}"))
            }
            Self::Failed(err) => Some(format!("could not generate summary: {err}")),
            _ => None,
        }
    }
}

/// Result of [`reconcile`]: both notes, ready for persistence.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub previous: Option<Note>,
    pub today: Note,
    /// Pending items of the previous note marked complete in this pass.
    pub newly_completed: usize,
    /// Pending items moved into today's note.
    pub carried_forward: usize,
    pub summary: SummaryOutcome,
}

/// Moves one pending item to the end of the completed list.
///
/// Out-of-range indices leave the note unchanged and return `false`.
pub fn mark_completed(note: &mut Note, pending_index: usize) -> bool {
    note.mark_item_completed(pending_index)
}

/// Applies completion verdicts to `previous` and carries the rest to `today`.
///
/// `verdicts[i]` decides `previous.pending_work[i]`; missing verdicts count as
/// "not completed". Returns `(newly_completed, carried_forward)`.
pub fn carry_forward(previous: &mut Note, today: &mut Note, verdicts: &[bool]) -> (usize, usize) {
    let pending = std::mem::take(&mut previous.pending_work);
    let mut completed = 0;
    let mut carried = 0;

    for (index, item) in pending.into_iter().enumerate() {
        if verdicts.get(index).copied().unwrap_or(false) {
            previous.completed_work.push(WorkItem::done(item.text));
            completed += 1;
        } else {
            today.pending_work.push(WorkItem::pending(item.text));
            carried += 1;
        }
    }

    (completed, carried)
}

/// Reconciles the most recent earlier note with today's note.
///
/// When `previous` ends up with completed work and a summarizer is supplied,
/// the summary of the full completed list is written to `previous.summary`
/// and `today.yesterday_summary`.
pub async fn reconcile(
    previous: Option<Note>,
    mut today: Note,
    verdicts: &[bool],
    summarizer: Option<&dyn Summarizer>,
) -> ReconcileOutcome {
    let Some(mut previous) = previous else {
        info!("event=reconcile module=service status=fresh_start");
        return ReconcileOutcome {
            previous: None,
            today,
            newly_completed: 0,
            carried_forward: 0,
            summary: SummaryOutcome::NotRequested,
        };
    };

    let (newly_completed, carried_forward) = if previous.has_pending_work() {
        carry_forward(&mut previous, &mut today, verdicts)
    } else {
        (0, 0)
    };
    info!(
        "event=reconcile module=service status=ok completed={} carried={}",
        newly_completed, carried_forward
    );

    let summary = if !previous.has_completed_work() {
        SummaryOutcome::NotRequested
    } else if let Some(summarizer) = summarizer {
        match request_summary(summarizer, &previous.completed_work).await {
            Ok(text) => {
                previous.summary = text.clone();
                today.yesterday_summary = text.clone();
                SummaryOutcome::Generated(text)
            }
            Err(err) => {
                warn!("event=reconcile_summary module=service status=error error={err}");
                SummaryOutcome::Failed(err)
            }
        }
    } else {
        SummaryOutcome::Skipped
    };

    ReconcileOutcome {
        previous: Some(previous),
        today,
        newly_completed,
        carried_forward,
        summary,
    }
}

/// Probes the backend, then summarizes. Output is flattened to one line.
pub async fn request_summary(
    summarizer: &dyn Summarizer,
    items: &[WorkItem],
) -> Result<String, SummarizerError> {
    summarizer.test_connection().await?;
    let text = summarizer.summarize(items).await?;
    Ok(single_line(&text))
}
