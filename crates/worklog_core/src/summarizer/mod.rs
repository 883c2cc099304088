//! Work summary generation through a remote chat-session backend.
//!
//! # Responsibility
//! - Turn a list of completed work items into a short narrative summary.
//! - Drive the session protocol: create session, send prompt, wait for the
//!   idle event or poll, then read assistant text.
//!
//! # Invariants
//! - An empty item list never touches the network.
//! - The event-stream listener never outlives one `summarize` call.
//! - No HTTP retries; the first failed create/send call fails the summary.
//!
//! # See also
//! - crates/worklog_core/src/service/reconcile.rs

pub mod client;
pub mod error;
pub mod events;
pub mod types;

use crate::model::work_item::WorkItem;
use async_trait::async_trait;

pub use client::{build_prompt, SummaryClient, SummaryClientOptions, EMPTY_SUMMARY_PLACEHOLDER};
pub use error::{SummarizerError, SummaryResult};

/// Summary backend seam used by reconciliation and daily services.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Cheap liveness probe, used to fail fast before a full session.
    async fn test_connection(&self) -> SummaryResult<()>;

    /// Summarizes item texts in order.
    async fn summarize(&self, items: &[WorkItem]) -> SummaryResult<String>;
}
