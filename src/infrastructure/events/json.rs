//! JSON Diagnostic Sink
//!
//! Outputs diagnostics as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{Diagnostic, DiagnosticSink};

/// Diagnostic sink that outputs one JSON object per line
pub struct JsonSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonSink {
    /// Create a JSON sink writing to stderr
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Create a JSON sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

fn to_json(diagnostic: &Diagnostic) -> serde_json::Value {
    let message = diagnostic.to_string();
    match diagnostic {
        Diagnostic::ImportNotFound { path } => serde_json::json!({
            "event": "import_not_found",
            "path": path.display().to_string(),
            "message": message,
        }),
        Diagnostic::EvidenceUnavailable { path, reason } => serde_json::json!({
            "event": "evidence_unavailable",
            "path": path.display().to_string(),
            "reason": reason,
            "message": message,
        }),
        Diagnostic::CacheEntryUnreadable { root, reason } => serde_json::json!({
            "event": "cache_entry_unreadable",
            "root": root.display().to_string(),
            "reason": reason,
            "message": message,
        }),
        Diagnostic::ConfigWarning {
            key,
            file,
            suggestion,
        } => serde_json::json!({
            "event": "config_warning",
            "key": key,
            "file": file.display().to_string(),
            "suggestion": suggestion,
            "message": message,
        }),
    }
}

impl DiagnosticSink for JsonSink {
    fn on_diagnostic(&self, diagnostic: Diagnostic) {
        self.write_event(to_json(&diagnostic));
    }
}
