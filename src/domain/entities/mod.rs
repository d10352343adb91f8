//! Domain Entities
//!
//! - `StylesheetFile` - A file entering the pipeline
//! - `ImportRecord` - One resolved dependency
//! - `CacheEntry` - Evidence recorded for a root stylesheet

mod cache_entry;
mod import_record;
mod stylesheet;

pub use cache_entry::CacheEntry;
pub use import_record::ImportRecord;
pub use stylesheet::{Contents, StylesheetFile};
