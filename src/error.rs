//! Error types for the site filter pipeline.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for site filter operations
pub type Result<T> = std::result::Result<T, SiteFilterError>;

/// Which input a failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    PositionList,
    Vcf,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::PositionList => write!(f, "position file"),
            FileKind::Vcf => write!(f, "VCF file"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SiteFilterError {
    /// Input file missing or unreadable
    #[error("cannot read {kind} '{}': {source}", .path.display())]
    NotFound {
        kind: FileKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line in an input file does not parse
    #[error("malformed {kind} '{}' at line {line}: {reason}", .path.display())]
    MalformedInput {
        kind: FileKind,
        path: PathBuf,
        /// 1-based line number
        line: usize,
        reason: String,
    },

    /// Output could not be created or written
    #[error("failed writing output VCF '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chunk bookkeeping violated; indicates a bug rather than bad input
    #[error("internal consistency error: {0}")]
    Consistency(String),

    /// The filter thread pool could not be started (e.g. thread limit reached)
    #[error("failed to start {threads} filter worker threads: {reason}")]
    WorkerPool { threads: usize, reason: String },
}

impl SiteFilterError {
    /// Map a read failure on an input file. Undecodable bytes are reported as
    /// malformed content, anything else as an unreadable file.
    pub fn from_read(kind: FileKind, path: &Path, line: usize, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::InvalidData {
            SiteFilterError::MalformedInput {
                kind,
                path: path.to_path_buf(),
                line,
                reason: err.to_string(),
            }
        } else {
            SiteFilterError::NotFound { kind, path: path.to_path_buf(), source: err }
        }
    }

    pub fn malformed(kind: FileKind, path: &Path, line: usize, reason: impl Into<String>) -> Self {
        SiteFilterError::MalformedInput {
            kind,
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}
