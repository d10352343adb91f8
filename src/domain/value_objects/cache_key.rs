//! Cache key derivation
//!
//! Each root stylesheet gets one persisted entry. The key is the SHA-256 of
//! the root's normalized absolute path, so `a/./b.less`, `a/x/../b.less` and
//! `a\b.less` all land on the same entry and long paths stay file-name safe.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};

/// Lexically normalize a path: drop `.` components, fold `..` into the
/// preceding component and render with forward slashes.
///
/// The file system is never consulted, so symlinks are not resolved.
pub fn normalize_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut prefix = String::new();
    let mut rooted = false;

    for component in path.components() {
        match component {
            Component::Prefix(p) => prefix = p.as_os_str().to_string_lossy().replace('\\', "/"),
            Component::RootDir => rooted = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(name) => parts.push(name.to_string_lossy().replace('\\', "/")),
        }
    }

    let mut out = prefix;
    if rooted {
        out.push('/');
    }
    out.push_str(&parts.join("/"));
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Make `path` absolute against `base` (when relative) and normalize it.
pub fn absolute_normalized(path: &Path, base: &Path) -> String {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&base.join(path))
    }
}

/// Persisted-entry identifier for a root stylesheet
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    digest: String,
    normalized: String,
}

impl CacheKey {
    /// Derive the key for `root`, resolving relative paths against the
    /// current working directory.
    pub fn for_root(root: &Path) -> Self {
        let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::for_root_in(root, &base)
    }

    /// Derive the key for `root`, resolving relative paths against `base`.
    pub fn for_root_in(root: &Path, base: &Path) -> Self {
        let normalized = absolute_normalized(root, base);
        let digest = format!("{:x}", Sha256::digest(normalized.as_bytes()));
        Self { digest, normalized }
    }

    /// Hex digest, used as the storage file stem
    pub fn as_str(&self) -> &str {
        &self.digest
    }

    /// The normalized absolute path the key was derived from
    pub fn normalized_path(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digest)
    }
}
