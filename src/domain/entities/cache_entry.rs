//! Cache entry entity - evidence recorded for one root stylesheet
//!
//! It's a pure data structure - persistence is handled by a `CacheStore`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::Evidence;

/// Evidence for a root file and every dependency it had when recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    root_path: PathBuf,
    root_evidence: Evidence,
    dependencies: BTreeMap<PathBuf, Evidence>,
}

impl CacheEntry {
    /// Create an entry with no dependencies
    pub fn new(root_path: impl Into<PathBuf>, root_evidence: Evidence) -> Self {
        Self {
            root_path: root_path.into(),
            root_evidence,
            dependencies: BTreeMap::new(),
        }
    }

    pub fn with_dependency(mut self, path: impl Into<PathBuf>, evidence: Evidence) -> Self {
        self.insert_dependency(path, evidence);
        self
    }

    pub fn insert_dependency(&mut self, path: impl Into<PathBuf>, evidence: Evidence) {
        self.dependencies.insert(path.into(), evidence);
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn root_evidence(&self) -> &Evidence {
        &self.root_evidence
    }

    /// Stored evidence for one dependency
    pub fn dependency(&self, path: &Path) -> Option<&Evidence> {
        self.dependencies.get(path)
    }

    /// All dependencies, sorted by path
    pub fn dependencies(&self) -> impl Iterator<Item = (&Path, &Evidence)> {
        self.dependencies.iter().map(|(p, e)| (p.as_path(), e))
    }

    /// Number of recorded dependencies
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}
