//! Diagnostic Sink Implementations
//!
//! Provides concrete implementations of DiagnosticSink:
//! - StderrSink: one human-readable line per diagnostic
//! - JsonSink: NDJSON output for CI/automation

mod json;
mod stderr;

pub use json::JsonSink;
pub use stderr::StderrSink;
