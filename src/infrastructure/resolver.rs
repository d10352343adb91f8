//! Search-path resolver
//!
//! Default `PathResolver`: the base directory first, then every search path
//! in the given order. Existence is checked through the `FileSystem` port.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::domain::ports::{FileSystem, PathResolver, ResolveError, ResolveResult};

pub struct SearchPathResolver {
    fs: Arc<dyn FileSystem>,
}

impl SearchPathResolver {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl PathResolver for SearchPathResolver {
    fn resolve(
        &self,
        base_dir: &Path,
        candidate: &str,
        search_paths: &[PathBuf],
    ) -> ResolveResult<PathBuf> {
        let first = if base_dir.as_os_str().is_empty() {
            clean(Path::new(candidate))
        } else {
            clean(&base_dir.join(candidate))
        };
        let rest = search_paths.iter().map(|p| clean(&p.join(candidate)));

        let mut tried: Vec<PathBuf> = Vec::new();
        for path in std::iter::once(first).chain(rest) {
            if tried.contains(&path) {
                continue;
            }
            match self.fs.try_exists(&path) {
                Ok(true) => return Ok(path),
                Ok(false) => tried.push(path),
                Err(source) => {
                    return Err(ResolveError::Io {
                        candidate: candidate.to_string(),
                        source,
                    })
                }
            }
        }

        Err(ResolveError::NotFound {
            candidate: candidate.to_string(),
            tried,
        })
    }
}

/// Collapse `.` and `..` lexically; `..` never climbs above a root.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
