//! Error types for the treemirror synchronization engine.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while reconciling a replica tree against its source.
///
/// Every variant carries the path that was being worked on so the driver can
/// report the aborted pass without extra context.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Failed to list directory {path:?}: {source}")]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compute digest of {path:?}: {source}")]
    Digest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from:?} to {to:?}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete {path:?}: {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid root {path:?}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },
}

impl SyncError {
    pub(crate) fn listing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Listing {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn digest(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Digest {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn copy(
        from: impl Into<PathBuf>,
        to: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        SyncError::Copy {
            from: from.into(),
            to: to.into(),
            source,
        }
    }

    pub(crate) fn delete(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Delete {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SyncError::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level errors surfaced by the binary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Change log error: {0}")]
    ChangeLogError(String),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
