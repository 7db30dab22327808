use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the content cache. Single-file reads rethrow so
/// callers can distinguish a missing file from other failures.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying failure was a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
        }
    }
}

/// Detection failed for a whole repository. Per-file problems never
/// produce this; only failing to enumerate the repository itself does.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("failed to enumerate {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum BranchError {
    #[error("git invocation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("git command failed: {stderr}")]
    Git { stderr: String },
}
