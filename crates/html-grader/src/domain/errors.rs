//! Domain-specific errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a missing or unreadable local input.
pub const EXIT_MISSING_INPUT: u8 = 1;
/// Exit status for a URL rejected before any network access.
pub const EXIT_INVALID_URL: u8 = 2;
/// Exit status for a failed remote acquisition.
pub const EXIT_FETCH_FAILED: u8 = 3;
/// Exit status for a selector the query engine cannot evaluate.
pub const EXIT_BAD_SELECTOR: u8 = 4;
/// Exit status for a report that could not be written to `--output`.
pub const EXIT_WRITE_FAILED: u8 = 5;

/// Every failure the grading pipeline can surface. None of them are retried.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("invalid url '{url}'")]
    Validation { url: String },

    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("GET {url} returned {status}{}", reason.as_deref().map(|r| format!(" {r}")).unwrap_or_default())]
    Fetch {
        url: String,
        status: u16,
        reason: Option<String>,
    },

    #[error("{}request to {url} failed: {message}", if *timed_out { "timed out: " } else { "" })]
    Network {
        url: String,
        message: String,
        timed_out: bool,
    },

    #[error("invalid checks file {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("invalid selector '{selector}': {reason}")]
    Query { selector: String, reason: String },

    #[error("failed to write report to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GradeError {
    /// Stable identifier for the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            GradeError::Validation { .. } => "validation",
            GradeError::NotFound { .. } => "not-found",
            GradeError::Read { .. } => "read",
            GradeError::Fetch { .. } => "fetch",
            GradeError::Network { .. } => "network",
            GradeError::Load { .. } => "load",
            GradeError::Query { .. } => "query",
            GradeError::Write { .. } => "write",
        }
    }

    /// Process exit status the CLI reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            GradeError::NotFound { .. } | GradeError::Read { .. } | GradeError::Load { .. } => {
                EXIT_MISSING_INPUT
            }
            GradeError::Validation { .. } => EXIT_INVALID_URL,
            GradeError::Fetch { .. } | GradeError::Network { .. } => EXIT_FETCH_FAILED,
            GradeError::Query { .. } => EXIT_BAD_SELECTOR,
            GradeError::Write { .. } => EXIT_WRITE_FAILED,
        }
    }

    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GradeError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
