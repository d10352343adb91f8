//! TOML Cache Store
//!
//! One document per root stylesheet, `<cache_dir>/<key>.toml`:
//!
//! ```toml
//! version = 1
//! root = "/project/styles/main.less"
//! path = "styles/main.less"
//! recorded_at = "2026-10-19T08:00:00Z"
//!
//! [root_evidence]
//! kind = "mtime"
//! secs = 1760860800
//! nanos = 0
//!
//! [dependencies."/project/styles/a.less"]
//! kind = "content"
//! hash = "sha256:..."
//! ```
//!
//! Writes go to a temp file in the same directory and are renamed over the
//! entry while holding an exclusive lock on `<key>.lock`.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::domain::entities::CacheEntry;
use crate::domain::ports::{CacheStore, StoreError, StoreResult};
use crate::domain::value_objects::{CacheKey, ContentHash, Evidence};

/// Current on-disk format
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// File-backed cache store
pub struct TomlCacheStore {
    dir: PathBuf,
}

impl TomlCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for `key` lives
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.toml", key.as_str()))
    }

    fn lock_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.lock", key.as_str()))
    }

    /// Run `f` while holding the exclusive lock for `key`.
    fn with_lock<T>(&self, key: &CacheKey, f: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
        fs::create_dir_all(&self.dir).map_err(access)?;

        let lock_file = fs::File::create(self.lock_path(key)).map_err(access)?;
        lock_file.lock_exclusive().map_err(access)?;

        let result = f();

        let _ = lock_file.unlock();
        result
    }

    fn write_entry(&self, key: &CacheKey, entry: &CacheEntry) -> StoreResult<()> {
        let document = to_toml(key, entry)?;
        let content = toml::to_string_pretty(&document).map_err(|e| {
            StoreError::SerializationError {
                message: e.to_string(),
            }
        })?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(access)?;
        tmp.write_all(content.as_bytes()).map_err(access)?;
        tmp.persist(self.entry_path(key))
            .map_err(|e| access(e.error))?;
        Ok(())
    }
}

fn access(e: std::io::Error) -> StoreError {
    StoreError::AccessError {
        message: e.to_string(),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlCacheEntry {
    version: u32,
    /// Normalized absolute root path the key was derived from
    root: String,
    /// Root path as it was recorded
    path: PathBuf,
    #[serde(default)]
    recorded_at: Option<DateTime<Utc>>,
    root_evidence: TomlEvidence,
    #[serde(default)]
    dependencies: BTreeMap<String, TomlEvidence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum TomlEvidence {
    Mtime { secs: u64, nanos: u32 },
    Content { hash: String },
}

impl From<&Evidence> for TomlEvidence {
    fn from(evidence: &Evidence) -> Self {
        match evidence {
            Evidence::Modified { secs, nanos } => TomlEvidence::Mtime {
                secs: *secs,
                nanos: *nanos,
            },
            Evidence::Content(hash) => TomlEvidence::Content {
                hash: hash.to_string(),
            },
        }
    }
}

impl From<TomlEvidence> for Evidence {
    fn from(evidence: TomlEvidence) -> Self {
        match evidence {
            TomlEvidence::Mtime { secs, nanos } => Evidence::Modified { secs, nanos },
            TomlEvidence::Content { hash } => Evidence::Content(ContentHash::from_stored(&hash)),
        }
    }
}

fn to_toml(key: &CacheKey, entry: &CacheEntry) -> StoreResult<TomlCacheEntry> {
    let mut dependencies = BTreeMap::new();
    for (path, evidence) in entry.dependencies() {
        let name = path.to_str().ok_or_else(|| StoreError::SerializationError {
            message: format!("dependency path is not valid UTF-8: {}", path.display()),
        })?;
        dependencies.insert(name.to_string(), TomlEvidence::from(evidence));
    }

    Ok(TomlCacheEntry {
        version: CACHE_FORMAT_VERSION,
        root: key.normalized_path().to_string(),
        path: entry.root_path().to_path_buf(),
        recorded_at: Some(Utc::now()),
        root_evidence: TomlEvidence::from(entry.root_evidence()),
        dependencies,
    })
}

fn from_toml(document: TomlCacheEntry) -> CacheEntry {
    let mut entry = CacheEntry::new(document.path, document.root_evidence.into());
    for (path, evidence) in document.dependencies {
        entry.insert_dependency(path, evidence.into());
    }
    entry
}

impl CacheStore for TomlCacheStore {
    fn load(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(access(e)),
        };

        let document: TomlCacheEntry =
            toml::from_str(&content).map_err(|e| StoreError::Corrupted {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if document.version != CACHE_FORMAT_VERSION {
            return Err(StoreError::VersionMismatch {
                found: document.version,
                expected: CACHE_FORMAT_VERSION,
            });
        }

        // digest collision or a hand-copied cache directory
        if document.root != key.normalized_path() {
            return Ok(None);
        }

        Ok(Some(from_toml(document)))
    }

    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> StoreResult<()> {
        self.with_lock(key, || self.write_entry(key, entry))
    }

    fn delete(&self, key: &CacheKey) -> StoreResult<()> {
        let path = self.entry_path(key);
        if !self.dir.exists() {
            return Ok(());
        }
        self.with_lock(key, || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(access(e)),
        })
    }
}
