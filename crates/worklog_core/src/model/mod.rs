//! Daily work-log domain model.
//!
//! # Responsibility
//! - Define the in-memory shape of one daily note and its work items.
//! - Own the naming conventions that bind a note to `(workplace, date)`.
//!
//! # Invariants
//! - Exactly one note exists per `(workplace, date)` pair.
//! - Note ids and file names are derived, never chosen by callers.
//!
//! # See also
//! - crates/worklog_core/src/codec/mod.rs

pub mod note;
pub mod work_item;
