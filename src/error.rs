//! Error types for the pkg-cleaner CLI.
//!
//! Uses thiserror for derive macros and keeps the underlying `io::Error`
//! as the `source()` so the full cause chain can be logged at the top level.

use crate::exit_codes;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pkg-cleaner operations.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// Invalid configuration or environment, detected before any mutation.
    #[error("{0}")]
    Config(String),

    /// A glob pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },

    /// Stat failed for a reason other than "not found".
    #[error("failed to stat '{}'", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A destructive or copy operation failed on a specific path.
    #[error("failed to {op} '{}'", path.display())]
    Fs {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One or more operations in a concurrent batch failed.
    #[error("{failed} of {total} filesystem operations failed")]
    Batch {
        failed: usize,
        total: usize,
        #[source]
        first: Box<CleanerError>,
    },
}

impl CleanerError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CleanerError::Config(_) => exit_codes::CONFIG_ERROR,
            CleanerError::Pattern { .. } => exit_codes::PATTERN_ERROR,
            CleanerError::Stat { .. } => exit_codes::FS_FAILURE,
            CleanerError::Fs { .. } => exit_codes::FS_FAILURE,
            CleanerError::Batch { .. } => exit_codes::FS_FAILURE,
        }
    }

    pub(crate) fn fs(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        CleanerError::Fs {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for pkg-cleaner operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Render an error followed by each `source()` in its chain.
pub fn format_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut msg = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        current = cause.source();
    }
    msg
}
