//! In-memory file system for unit tests
//!
//! Uses `Arc<Mutex<>>` internally so it can be cloned and shared with the
//! services under test while the test keeps mutating it.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct State {
    files: HashMap<PathBuf, MockFile>,
    faults: HashMap<PathBuf, io::ErrorKind>,
    clock: u64,
}

/// Mock file system with a logical clock for modification times
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<State>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite a file; its modification time advances.
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(1_000 + state.clock);
        state.files.insert(
            path.into(),
            MockFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Bump a file's modification time without changing its content.
    pub fn touch(&self, path: &Path) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(1_000 + state.clock);
        if let Some(file) = state.files.get_mut(path) {
            file.modified = modified;
        }
    }

    pub fn remove(&self, path: &Path) {
        self.state.lock().unwrap().files.remove(path);
    }

    /// Make every query on `path` fail with `kind`.
    pub fn fail(&self, path: impl Into<PathBuf>, kind: io::ErrorKind) {
        self.state.lock().unwrap().faults.insert(path.into(), kind);
    }

    pub fn heal(&self, path: &Path) {
        self.state.lock().unwrap().faults.remove(path);
    }

    fn lookup(&self, path: &Path) -> FsResult<MockFile> {
        let state = self.state.lock().unwrap();
        if let Some(kind) = state.faults.get(path) {
            return Err(FsError::at(path, io::Error::new(*kind, "injected fault")));
        }
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }
}

impl FileSystem for MockFileSystem {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>> {
        self.lookup(path).map(|f| f.content)
    }

    fn try_exists(&self, path: &Path) -> FsResult<bool> {
        match self.lookup(path) {
            Ok(_) => Ok(true),
            Err(FsError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn modified(&self, path: &Path) -> FsResult<SystemTime> {
        self.lookup(path).map(|f| f.modified)
    }
}
