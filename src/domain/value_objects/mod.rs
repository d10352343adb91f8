//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod cache_key;
mod evidence;
mod hash;

pub use cache_key::{absolute_normalized, normalize_path, CacheKey};
pub use evidence::{Evidence, EvidenceKind};
pub use hash::ContentHash;
