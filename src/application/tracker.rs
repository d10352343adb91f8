//! Tracker Use Case
//!
//! What a build pipeline calls per root stylesheet:
//!
//! ```text
//! needs_build(root) ── true ──> compile ── ok ──> mark_built(root)
//! ```
//!
//! `needs_build` captures evidence when it answers `true`, and `mark_built`
//! records that capture. A file edited while the compiler runs therefore
//! still shows up as changed on the next pass.
//!
//! `from_config` is the dependency injection point: local file system,
//! search-path resolver, built-in processor and the TOML cache store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::domain::entities::{CacheEntry, ImportRecord};
use crate::domain::ports::{DiagnosticSink, FileSystem, ImportPlugin};
use crate::domain::services::{ChangeDetector, ImportResolver};
use crate::error::{CacheResult, ImportResult};
use crate::infrastructure::fs::LocalFs;
use crate::infrastructure::processor::LessImportProcessor;
use crate::infrastructure::repositories::TomlCacheStore;
use crate::infrastructure::resolver::SearchPathResolver;

pub struct Tracker {
    detector: ChangeDetector,
    /// Evidence captured before the build, keyed by root as given
    pending: Mutex<HashMap<PathBuf, CacheEntry>>,
}

impl Tracker {
    pub fn new(detector: ChangeDetector) -> Self {
        Self {
            detector,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Wire the default adapters from configuration
    pub fn from_config(config: &Config, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::from_config_with_plugins(config, Vec::new(), sink)
    }

    /// Like [`from_config`](Self::from_config), with import plugins consulted
    /// before the search paths.
    pub fn from_config_with_plugins(
        config: &Config,
        plugins: Vec<Arc<dyn ImportPlugin>>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(LocalFs::new());
        let resolver = Arc::new(SearchPathResolver::new(fs.clone()));
        let processor = Arc::new(LessImportProcessor::new(fs.clone(), resolver.clone()));

        let mut options = config.resolver.render_options();
        options.plugins = plugins;

        let imports =
            ImportResolver::new(processor, resolver, fs.clone(), sink.clone()).with_options(&options);
        let store = Arc::new(TomlCacheStore::new(config.cache.dir()));
        let detector =
            ChangeDetector::new(imports, store, fs, sink).with_evidence(config.cache.evidence);

        Self::new(detector)
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Every file `root` currently depends on
    pub fn dependencies(&self, root: &Path) -> ImportResult<Vec<ImportRecord>> {
        self.detector.import_resolver().list_imports_for_path(root)
    }

    /// Does `root` have to be compiled again?
    pub fn needs_build(&self, root: &Path) -> CacheResult<bool> {
        let changed = self.detector.check(root)?;
        // a root that cannot be snapshotted now is snapshotted again in mark_built
        let before = if changed {
            self.detector.snapshot(root).ok()
        } else {
            None
        };

        if let Ok(mut pending) = self.pending.lock() {
            match before {
                Some(entry) => {
                    pending.insert(root.to_path_buf(), entry);
                }
                None => {
                    pending.remove(root);
                }
            }
        }
        Ok(changed)
    }

    /// Record evidence after `root` compiled successfully: the evidence
    /// captured by the last `needs_build`, or fresh evidence without one.
    pub fn mark_built(&self, root: &Path) -> CacheResult<()> {
        let captured = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(root));
        let entry = match captured {
            Some(entry) => entry,
            None => self.detector.snapshot(root)?,
        };
        self.detector.record(&entry)
    }

    /// Forget `root`; its next check reports a change.
    pub fn invalidate(&self, root: &Path) -> CacheResult<()> {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(root);
        }
        self.detector.forget(root)
    }
}
