//! Content digest used as change evidence when modification times are not
//! trusted (checkouts, touch-heavy tooling).

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 of a file's bytes, rendered as `sha256:<hex>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub const PREFIX: &'static str = "sha256:";

    /// Digest `content`.
    pub fn from_bytes(content: &[u8]) -> Self {
        Self(format!("{}{:x}", Self::PREFIX, Sha256::digest(content)))
    }

    /// Rebuild a digest read back from a cache entry. Entries written by
    /// hand may omit the prefix.
    pub fn from_stored(stored: &str) -> Self {
        let digest = stored.strip_prefix(Self::PREFIX).unwrap_or(stored);
        Self(format!("{}{}", Self::PREFIX, digest.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digits only
    pub fn digest(&self) -> &str {
        &self.0[Self::PREFIX.len()..]
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
