//! Markdown note codec.
//!
//! # Responsibility
//! - Decode the fixed markdown subset of daily notes into [`Note`].
//! - Encode [`Note`] back into the same format.
//!
//! # Invariants
//! - Decoding never fails on content; only reading the file can fail.
//! - `decode(encode(note))` reproduces every field the codec understands.
//! - The codec holds no state between calls.
//!
//! # See also
//! - crates/worklog_core/src/repo/note_repo.rs
//!
//! [`Note`]: crate::model::note::Note

pub mod decode;
pub mod encode;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use decode::{parse_checkbox, parse_note, read_note, DecodeState};
pub use encode::render_note;

pub const FRONTMATTER_FENCE: &str = "---";
pub const SUMMARY_PREFIX: &str = "summary::";
pub const YESTERDAY_SUMMARY_PREFIX: &str = "yesterday's summary::";
pub const PENDING_HEADING: &str = "## Pending Work";
pub const COMPLETED_HEADING: &str = "## Work Completed";

pub type CodecResult<T> = Result<T, CodecError>;

/// Codec failure. Malformed content is tolerated, so only I/O can fail.
#[derive(Debug)]
pub enum CodecError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read note `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
        }
    }
}
