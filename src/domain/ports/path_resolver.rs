//! PathResolver port - locating a literal resource reference on disk
//!
//! The contract is deliberately narrow: try the base directory, then every
//! search path in the order given, and return the first candidate that
//! exists.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::file_system::FsError;

/// Result type for path resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Path resolution errors
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No candidate location exists
    #[error("'{candidate}' wasn't found. Tried - {}", join_tried(.tried))]
    NotFound {
        candidate: String,
        tried: Vec<PathBuf>,
    },

    /// The search itself hit a file system fault
    #[error("failed to resolve '{candidate}': {source}")]
    Io {
        candidate: String,
        #[source]
        source: FsError,
    },
}

fn join_tried(tried: &[PathBuf]) -> String {
    tried
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolves a literal reference against a base directory and search paths
pub trait PathResolver: Send + Sync {
    /// Resolve `candidate`.
    ///
    /// An empty `base_dir` means "no base": the candidate is tried as given
    /// (used for absolute references).
    fn resolve(
        &self,
        base_dir: &Path,
        candidate: &str,
        search_paths: &[PathBuf],
    ) -> ResolveResult<PathBuf>;
}
