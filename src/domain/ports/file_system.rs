//! FileSystem port - abstraction over the file queries dependency tracking needs
//!
//! The import resolver and the change detector never touch `std::fs`
//! directly; they receive a handle implementing this trait so tests can
//! substitute an in-memory tree or inject faults.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::domain::value_objects::ContentHash;

/// Result type for file system operations
pub type FsResult<T> = Result<T, FsError>;

/// File system operation errors
#[derive(Debug)]
pub enum FsError {
    /// File not found
    NotFound(PathBuf),
    /// Permission denied
    PermissionDenied(PathBuf),
    /// I/O error
    Io(PathBuf, io::Error),
    /// Other error
    Other(String),
}

impl FsError {
    /// Classify an I/O error while keeping the path it happened on.
    pub fn at(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(path.to_path_buf(), err),
        }
    }

    /// True when the error means the path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

impl From<io::Error> for FsError {
    fn from(err: io::Error) -> Self {
        FsError::at(Path::new(""), err)
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "File not found: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "Permission denied: {}", path.display())
            }
            FsError::Io(path, err) => write!(f, "I/O error on {}: {}", path.display(), err),
            FsError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FsError::Io(_, err) => Some(err),
            _ => None,
        }
    }
}

/// Abstract file system interface
///
/// Implementations:
/// - `LocalFs` - standard file I/O
/// - `MockFileSystem` - in-memory for unit tests
pub trait FileSystem: Send + Sync {
    /// Read raw file content
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Check if a path exists.
    ///
    /// Unlike `Path::exists`, faults other than "not found" are reported
    /// instead of being folded into `false`.
    fn try_exists(&self, path: &Path) -> FsResult<bool>;

    /// Last modification time of a file
    fn modified(&self, path: &Path) -> FsResult<SystemTime>;

    /// Compute content hash (SHA256)
    fn hash(&self, path: &Path) -> FsResult<ContentHash> {
        let bytes = self.read(path)?;
        Ok(ContentHash::from_bytes(&bytes))
    }
}
