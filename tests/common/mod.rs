//! Common test utilities for lessdeps integration tests.
//!
//! - `Project`: an isolated source tree in a temp directory, with a cache
//!   directory next to it
//! - `tracker` helpers wiring the default adapters

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use lessdeps::{CollectingSink, Config, EvidenceKind, Tracker};
use tempfile::TempDir;

/// Isolated source tree
pub struct Project {
    root: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.root.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.path(".cache")
    }

    /// Write a file (creating parents) with a fixed, old modification time.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        set_mtime(&path, UNIX_EPOCH + Duration::from_secs(1_600_000_000));
        path
    }

    /// Advance a file's modification time without touching its content.
    pub fn touch(&self, relative: &str) {
        let path = self.path(relative);
        let current = fs::metadata(&path)
            .and_then(|m| m.modified())
            .expect("read mtime");
        set_mtime(&path, current + Duration::from_secs(5));
    }

    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path(relative)).expect("remove file");
    }

    pub fn config(&self, evidence: EvidenceKind) -> Config {
        let mut config = Config::default();
        config.cache.dir = Some(self.cache_dir());
        config.cache.evidence = evidence;
        config
    }

    pub fn tracker(&self) -> (Tracker, Arc<CollectingSink>) {
        self.tracker_with(self.config(EvidenceKind::Mtime))
    }

    pub fn tracker_with(&self, config: Config) -> (Tracker, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        (Tracker::from_config(&config, sink.clone()), sink)
    }
}

fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .expect("set mtime");
}
