//! Summary client errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SummaryResult<T> = Result<T, SummarizerError>;

/// Failure of one summary protocol stage.
#[derive(Debug)]
pub enum SummarizerError {
    /// The backend could not be reached (or the HTTP client could not be built).
    Connection {
        stage: &'static str,
        source: reqwest::Error,
    },
    /// The backend answered with a non-200 status.
    Status {
        stage: &'static str,
        status: u16,
        body: String,
    },
    /// The backend answered with a body that does not match the protocol.
    Decode {
        stage: &'static str,
        source: reqwest::Error,
    },
    /// The backend never produced assistant text within the wait budget.
    NoResponse,
}

impl SummarizerError {
    /// `true` for unreachable backends and non-200 answers.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Status { .. })
    }
}

impl Display for SummarizerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection { stage, source } => {
                write!(f, "summary backend unreachable during {stage}: {source}")
            }
            Self::Status {
                stage,
                status,
                body,
            } => write!(
                f,
                "summary backend returned status {status} during {stage}: {body}"
            ),
            Self::Decode { stage, source } => {
                write!(f, "invalid summary backend response during {stage}: {source}")
            }
            Self::NoResponse => write!(f, "no response received"),
        }
    }
}

impl Error for SummarizerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connection { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::Status { .. } | Self::NoResponse => None,
        }
    }
}
