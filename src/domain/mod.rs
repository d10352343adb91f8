//! Domain Layer
//!
//! Dependency enumeration and change detection, without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Core domain entities (StylesheetFile, ImportRecord, CacheEntry)
//! - `value_objects/` - Immutable value types (Evidence, ContentHash, CacheKey)
//! - `services/` - Domain services (ImportResolver, ChangeDetector, reference scanner)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports,
//!    injected at construction time

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
