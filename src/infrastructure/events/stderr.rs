//! Stderr Diagnostic Sink

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{Diagnostic, DiagnosticSink};

/// Prints each diagnostic as a single line, optionally prefixed
pub struct StderrSink {
    prefix: Option<String>,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl StderrSink {
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Write to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            prefix: None,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Prefix every line, e.g. with the plugin name
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for StderrSink {
    fn on_diagnostic(&self, diagnostic: Diagnostic) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = match &self.prefix {
                Some(prefix) => writeln!(writer, "[{}] {}", prefix, diagnostic),
                None => writeln!(writer, "{}", diagnostic),
            };
        }
    }
}
