//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (local disk, in-memory for tests)
//! - `repositories/` - Cache stores (TOML files, in-memory)
//! - `events/` - Diagnostic sinks (stderr, NDJSON)
//! - `resolver` - Search-path resolver
//! - `processor` - Built-in LESS import processor

pub mod events;
pub mod fs;
pub mod processor;
pub mod repositories;
pub mod resolver;

// Re-export for convenience
pub use events::{JsonSink, StderrSink};
pub use fs::LocalFs;
pub use processor::LessImportProcessor;
pub use repositories::{MemoryCacheStore, TomlCacheStore};
pub use resolver::SearchPathResolver;
