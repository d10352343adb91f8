//! Domain Services
//!
//! Dependency enumeration and change detection. Services reach the outside
//! world only through the ports they are constructed with.

mod change_detector;
mod import_resolver;
mod reference_scanner;
pub(crate) mod source_text;

pub use change_detector::ChangeDetector;
pub use import_resolver::ImportResolver;
pub use reference_scanner::{scan_references, EmbeddedReference, MalformedCall, ReferencePath};
