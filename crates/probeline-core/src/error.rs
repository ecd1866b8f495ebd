//! Error types for the ingestion engine
//!
//! [`IngestError`] is fatal and aborts the run. [`MalformedLine`] and
//! [`ProbeError`] are per-item: they are written to the error log and the
//! loop moves on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal error: the run cannot continue safely.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Store file exists but is not a valid sequence of records.
    #[error("corrupt store {} at line {line}: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("cannot open error log {}: {source}", .path.display())]
    ErrorLogUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to append to store {}: {source}", .path.display())]
    StoreWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Input line that does not have the `IDENTIFIER<TAB>LOCATOR` shape.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("input line does not match \"UUID<TAB>URL\" pattern: {line}")]
pub struct MalformedLine {
    pub line: String,
}

/// Probe failure for a single locator.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Prober binary missing or not executable.
    #[error("failed to launch prober: {0}")]
    Launch(#[source] io::Error),

    #[error("prober exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("unreadable prober output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl ProbeError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
