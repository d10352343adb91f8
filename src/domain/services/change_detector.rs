//! Change Detector
//!
//! Decides whether a root stylesheet must be rebuilt. Every doubt resolves
//! towards "changed": a missing entry, unreadable evidence, a deleted or
//! newly added dependency. A malformed `data-uri` call is the one listing
//! failure returned as an error. Only an exact match on the root and on every
//! current dependency yields "unchanged".
//!
//! Flow per root file:
//!
//! ```text
//! check(root) ── true ──> pipeline builds ── ok ──> record(snapshot(root))
//!      └────── false ──> pipeline skips
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::import_resolver::ImportResolver;
use crate::domain::entities::{CacheEntry, StylesheetFile};
use crate::domain::ports::{CacheStore, Diagnostic, DiagnosticSink, FileSystem, FsError, FsResult};
use crate::domain::value_objects::{CacheKey, Evidence, EvidenceKind};
use crate::error::{CacheError, CacheResult};

pub struct ChangeDetector {
    imports: ImportResolver,
    store: Arc<dyn CacheStore>,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn DiagnosticSink>,
    evidence: EvidenceKind,
    base_dir: Option<PathBuf>,
}

impl ChangeDetector {
    pub fn new(
        imports: ImportResolver,
        store: Arc<dyn CacheStore>,
        fs: Arc<dyn FileSystem>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            imports,
            store,
            fs,
            sink,
            evidence: EvidenceKind::default(),
            base_dir: None,
        }
    }

    pub fn with_evidence(mut self, evidence: EvidenceKind) -> Self {
        self.evidence = evidence;
        self
    }

    /// Resolve relative roots against `base_dir` instead of the current
    /// directory when deriving cache keys.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn import_resolver(&self) -> &ImportResolver {
        &self.imports
    }

    pub fn evidence_kind(&self) -> EvidenceKind {
        self.evidence
    }

    fn key(&self, root: &Path) -> CacheKey {
        match &self.base_dir {
            Some(base) => CacheKey::for_root_in(root, base),
            None => CacheKey::for_root(root),
        }
    }

    /// Current evidence for one file
    pub fn evidence_for(&self, path: &Path) -> FsResult<Evidence> {
        match self.evidence {
            EvidenceKind::Mtime => self.fs.modified(path).map(Evidence::from_modified),
            EvidenceKind::Content => self.fs.hash(path).map(Evidence::Content),
        }
    }

    fn unavailable(&self, path: &Path, err: &FsError) {
        self.sink.on_diagnostic(Diagnostic::EvidenceUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        });
    }

    /// Has `root` or any of its current dependencies changed since the last
    /// recorded pass?
    ///
    /// Every evidence problem answers `true`, including a dependency the
    /// import listing can no longer locate or read. Only a malformed
    /// embedded-resource call is returned as an error.
    pub fn check(&self, root: &Path) -> CacheResult<bool> {
        let stored = match self.store.load(&self.key(root)) {
            Ok(Some(entry)) => entry,
            Ok(None) => return Ok(true),
            Err(err) => {
                self.sink.on_diagnostic(Diagnostic::CacheEntryUnreadable {
                    root: root.to_path_buf(),
                    reason: err.to_string(),
                });
                return Ok(true);
            }
        };

        match self.evidence_for(root) {
            Ok(current) if &current == stored.root_evidence() => {}
            Ok(_) => return Ok(true),
            Err(err) => {
                self.unavailable(root, &err);
                return Ok(true);
            }
        }

        let contents = match self.fs.read(root) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.unavailable(root, &err);
                return Ok(true);
            }
        };
        let dependencies = match self
            .imports
            .list_imports(Some(StylesheetFile::new(root, contents)))
        {
            Ok(dependencies) => dependencies,
            Err(err) if err.is_malformed_reference() => return Err(err.into()),
            // a dependency that can no longer be located or read
            Err(err) => {
                self.sink.on_diagnostic(Diagnostic::EvidenceUnavailable {
                    path: root.to_path_buf(),
                    reason: err.to_string(),
                });
                return Ok(true);
            }
        };

        for dependency in dependencies {
            let Some(recorded) = stored.dependency(dependency.path()) else {
                return Ok(true);
            };
            match self.evidence_for(dependency.path()) {
                Ok(current) if &current == recorded => {}
                Ok(_) => return Ok(true),
                Err(err) if err.is_not_found() => return Ok(true),
                Err(err) => {
                    self.unavailable(dependency.path(), &err);
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Fresh evidence for `root` and its current dependencies, ready to
    /// pass to [`record`](Self::record) once the build succeeded.
    pub fn snapshot(&self, root: &Path) -> CacheResult<CacheEntry> {
        let evidence = |path: &Path| {
            self.evidence_for(path).map_err(|source| CacheError::Evidence {
                path: path.to_path_buf(),
                source,
            })
        };

        let mut entry = CacheEntry::new(root, evidence(root)?);
        for dependency in self.imports.list_imports_for_path(root)? {
            let current = evidence(dependency.path())?;
            entry.insert_dependency(dependency.into_path(), current);
        }
        Ok(entry)
    }

    /// Replace the stored entry for the entry's root in full.
    pub fn record(&self, entry: &CacheEntry) -> CacheResult<()> {
        self.store.save(&self.key(entry.root_path()), entry)?;
        Ok(())
    }

    /// Drop the stored entry for `root`, forcing the next check to say
    /// "changed".
    pub fn forget(&self, root: &Path) -> CacheResult<()> {
        self.store.delete(&self.key(root))?;
        Ok(())
    }
}
