//! Error types for lessdeps
//!
//! Uses `thiserror` for library errors. Port-level errors (`FsError`,
//! `ResolveError`, `ProcessorError`, `StoreError`) live next to their ports;
//! this module holds the errors the public services return.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ports::{FsError, ProcessorError, ResolveError, StoreError};

/// Result type alias for import listing
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type alias for change detection
pub type CacheResult<T> = Result<T, CacheError>;

/// Why a root file's imports could not be processed
#[derive(Error, Debug)]
pub enum ProcessingFailure {
    /// The stylesheet processor failed (e.g. an unresolvable `@import`)
    #[error(transparent)]
    Processor(#[from] ProcessorError),

    /// The path resolver rejected an embedded-resource reference
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// A structurally invalid embedded-resource call
    #[error("malformed reference in '{}': {message} on line {line}", .file.display())]
    MalformedReference {
        file: PathBuf,
        line: usize,
        message: String,
    },
}

/// Import listing errors
#[derive(Error, Debug)]
pub enum ImportError {
    /// Fatal failure while processing a root file; the cause is chained
    #[error("Failed to process imports for '{}': {source}", .root.display())]
    Processing {
        root: PathBuf,
        #[source]
        source: ProcessingFailure,
    },

    /// Contents could not be read or decoded
    #[error("failed to read contents of '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected file system fault during an existence check
    #[error(transparent)]
    Io(#[from] FsError),
}

impl ImportError {
    pub(crate) fn processing(root: impl Into<PathBuf>, source: impl Into<ProcessingFailure>) -> Self {
        ImportError::Processing {
            root: root.into(),
            source: source.into(),
        }
    }

    /// Structurally invalid `data-uri` call, as opposed to a lookup failure
    pub fn is_malformed_reference(&self) -> bool {
        matches!(
            self,
            ImportError::Processing {
                source: ProcessingFailure::MalformedReference { .. },
                ..
            }
        )
    }
}

/// Change detection errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Dependencies of the root could not be listed
    #[error(transparent)]
    Import(#[from] ImportError),

    /// The cache store failed to persist or remove an entry
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Evidence for a file could not be collected while taking a snapshot
    #[error("cannot collect evidence for '{}': {source}", .path.display())]
    Evidence {
        path: PathBuf,
        #[source]
        source: FsError,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}
