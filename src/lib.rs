//! lessdeps - dependency tracking for incremental LESS builds
//!
//! Lists every file a stylesheet transitively depends on (conventional
//! `@import`s and `data-uri(...)` resources) and remembers per-file change
//! evidence between build invocations, so unchanged stylesheets can be
//! skipped.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::Tracker;
pub use config::{CacheConfig, Config, ResolverConfig};
pub use domain::entities::{CacheEntry, Contents, ImportRecord, StylesheetFile};
pub use domain::ports::{
    CacheStore, CollectingSink, Diagnostic, DiagnosticSink, FileSystem, FsError, ImportPlugin,
    NoopSink, PathResolver, ProcessedStylesheet, ProcessorError, RenderOptions, ResolveError,
    SourceUnit, StoreError, StylesheetProcessor,
};
pub use domain::services::{scan_references, ChangeDetector, ImportResolver};
pub use domain::value_objects::{CacheKey, ContentHash, Evidence, EvidenceKind};
pub use error::{CacheError, CacheResult, ConfigError, ImportError, ImportResult, ProcessingFailure};
pub use infrastructure::{
    JsonSink, LessImportProcessor, LocalFs, MemoryCacheStore, SearchPathResolver, StderrSink,
    TomlCacheStore,
};
