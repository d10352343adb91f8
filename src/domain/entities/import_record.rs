//! Import record - one resolved dependency of a root stylesheet

use std::fmt;
use std::path::{Path, PathBuf};

/// A dependency location, as resolved (absolute or relative)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportRecord {
    path: PathBuf,
}

impl ImportRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

impl fmt::Display for ImportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for ImportRecord {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for ImportRecord {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}
