//! Repository layer over the notes directory.
//!
//! # Responsibility
//! - Define use-case oriented note lookup/persistence contracts.
//! - Keep file naming and directory scanning out of service orchestration.
//!
//! # Invariants
//! - A missing note file is a normal `None`, never an error.
//! - Filesystem failures are always surfaced, never swallowed.
//!
//! # See also
//! - crates/worklog_core/src/codec/mod.rs

pub mod note_repo;
