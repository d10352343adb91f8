//! Diagnostic Sink Port
//!
//! Non-fatal conditions (a missing embedded resource, an unreadable cache
//! entry, an unknown configuration key) never surface as errors. They are
//! reported here instead, so the embedding pipeline decides where they go.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

/// Diagnostic emitted while listing imports or checking the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An embedded resource resolved to a path that does not exist
    ImportNotFound { path: PathBuf },

    /// Evidence for a file could not be read; the root is treated as changed
    EvidenceUnavailable { path: PathBuf, reason: String },

    /// A stored cache entry could not be loaded; treated as a first build
    CacheEntryUnreadable { root: PathBuf, reason: String },

    /// Unknown key in a configuration file
    ConfigWarning {
        key: String,
        file: PathBuf,
        suggestion: Option<String>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ImportNotFound { path } => {
                write!(f, "Import '{}' not found.", path.display())
            }
            Diagnostic::EvidenceUnavailable { path, reason } => {
                write!(
                    f,
                    "Cannot read change evidence for '{}': {}",
                    path.display(),
                    reason
                )
            }
            Diagnostic::CacheEntryUnreadable { root, reason } => {
                write!(
                    f,
                    "Ignoring cache entry for '{}': {}",
                    root.display(),
                    reason
                )
            }
            Diagnostic::ConfigWarning {
                key,
                file,
                suggestion,
            } => {
                write!(f, "Unknown config key '{}' in {}", key, file.display())?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }
                Ok(())
            }
        }
    }
}

/// Trait for receiving diagnostics
///
/// Implementations:
/// - `NoopSink`: drop everything
/// - `CollectingSink`: keep diagnostics in memory
/// - `StderrSink` / `JsonSink` (infrastructure): print them
pub trait DiagnosticSink: Send + Sync {
    fn on_diagnostic(&self, diagnostic: Diagnostic);
}

/// No-op sink for silent operation
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn on_diagnostic(&self, _diagnostic: Diagnostic) {}
}

/// Sink that records diagnostics in order
#[derive(Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Rendered messages, in order
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics().iter().map(ToString::to_string).collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn on_diagnostic(&self, diagnostic: Diagnostic) {
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diagnostic);
        }
    }
}
