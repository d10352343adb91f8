//! CacheStore port
//!
//! Durable storage for change-detection entries, one per root stylesheet.
//! A build is usually many short-lived processes, so entries must outlive
//! the process that recorded them.

use std::path::PathBuf;

use crate::domain::entities::CacheEntry;
use crate::domain::value_objects::CacheKey;

/// Result type for cache store operations
pub type StoreResult<T> = Result<T, StoreError>;

pub trait CacheStore: Send + Sync {
    /// Load the entry stored under `key`; `Ok(None)` when there is none.
    fn load(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>>;

    /// Replace whatever is stored under `key` with `entry`.
    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> StoreResult<()>;

    /// Remove the entry stored under `key`, if any.
    fn delete(&self, key: &CacheKey) -> StoreResult<()>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to access cache store: {message}")]
    AccessError { message: String },

    #[error("failed to serialize cache entry: {message}")]
    SerializationError { message: String },

    #[error("cache entry corrupted: {path}: {message}")]
    Corrupted { path: PathBuf, message: String },

    #[error("cache entry format incompatible (found version {found}, expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },
}
