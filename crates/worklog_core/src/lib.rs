//! Core domain logic for the daily work log.
//! This crate owns the note format, the on-disk repository and the daily
//! reconciliation rules; front ends only collect input and print results.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod summarizer;

pub use codec::{parse_note, read_note, render_note, CodecError, CodecResult};
pub use config::{Config, ConfigError, ConfigResult};
pub use logging::{default_log_dir, default_log_level, init_logging, logging_status};
pub use model::note::{note_filename, note_id, workplace_tag, Note};
pub use model::work_item::WorkItem;
pub use repo::note_repo::{FsNoteRepository, NoteRepository, RepoError, RepoResult};
pub use service::daily_service::{
    DailyService, ReviewReport, StartReport, TodaySummary, WorkflowError, WorkflowResult,
};
pub use service::reconcile::{
    carry_forward, mark_completed, reconcile, ReconcileOutcome, SummaryOutcome,
};
pub use summarizer::{
    SummarizerError, Summarizer, SummaryClient, SummaryClientOptions, SummaryResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
