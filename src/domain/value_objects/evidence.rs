//! Change evidence value objects
//!
//! Evidence is whatever comparable state we keep about a file to decide
//! whether it changed since the last recorded pass.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::ContentHash;

/// Which kind of evidence to collect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceKind {
    /// Modification time (cheap, the default)
    #[default]
    Mtime,
    /// SHA-256 of the file content (survives touch/checkout churn)
    Content,
}

impl FromStr for EvidenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mtime" | "modified" => Ok(EvidenceKind::Mtime),
            "content" | "hash" | "sha256" => Ok(EvidenceKind::Content),
            other => Err(format!("unknown evidence kind '{}'", other)),
        }
    }
}

/// Evidence for one file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Evidence {
    /// Modification time as seconds + nanoseconds since the UNIX epoch
    Modified { secs: u64, nanos: u32 },
    /// Content digest
    Content(ContentHash),
}

impl Evidence {
    /// Evidence from a modification timestamp.
    ///
    /// Timestamps before the epoch collapse to zero.
    pub fn from_modified(time: SystemTime) -> Self {
        let since = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Evidence::Modified {
            secs: since.as_secs(),
            nanos: since.subsec_nanos(),
        }
    }

    pub fn kind(&self) -> EvidenceKind {
        match self {
            Evidence::Modified { .. } => EvidenceKind::Mtime,
            Evidence::Content(_) => EvidenceKind::Content,
        }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Modified { secs, nanos } => write!(f, "mtime:{}.{:09}", secs, nanos),
            Evidence::Content(hash) => write!(f, "{}", hash),
        }
    }
}
