//! Cache Store Implementations
//!
//! Concrete implementations of the `CacheStore` port.

mod cache;
mod memory;

pub use cache::{TomlCacheStore, CACHE_FORMAT_VERSION};
pub use memory::MemoryCacheStore;
