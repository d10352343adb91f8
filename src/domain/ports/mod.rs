//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations, and every
//! service receives them at construction time.

pub mod cache_store;
pub mod diagnostics;
pub mod file_system;
pub mod path_resolver;
pub mod stylesheet_processor;

pub use cache_store::{CacheStore, StoreError, StoreResult};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, NoopSink};
pub use file_system::{FileSystem, FsError, FsResult};
pub use path_resolver::{PathResolver, ResolveError, ResolveResult};
pub use stylesheet_processor::{
    ImportPlugin, ProcessedStylesheet, ProcessorError, RenderOptions, SourceUnit,
    StylesheetProcessor,
};
