use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single read or write against the target file.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            Self::NotFound { path: path.into() }
        } else {
            Self::ReadFailure {
                path: path.into(),
                source,
            }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            Self::NotFound { path: path.into() }
        } else {
            Self::WriteFailure {
                path: path.into(),
                source,
            }
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
