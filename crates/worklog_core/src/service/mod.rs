//! Core use-case services.
//!
//! # Responsibility
//! - Compute the day-to-day carry-forward of work items.
//! - Orchestrate repository and summarizer calls into daily workflows.
//!
//! # See also
//! - crates/worklog_core/src/repo/note_repo.rs

pub mod daily_service;
pub mod reconcile;
