//! StylesheetProcessor port - the compiler front-end that expands `@import`
//!
//! The import resolver hands the processor the root's text together with
//! a private copy of the render options. The processor follows conventional
//! imports itself and reports every file it pulled in, plus the text of each
//! unit it parsed so embedded-resource calls can be scanned afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::file_system::FsError;
use super::path_resolver::ResolveError;
use crate::domain::entities::ImportRecord;

/// Hook that may claim an import before the default lookup runs
///
/// This is the counterpart of a compiler file-manager plugin: e.g. a plugin
/// mapping `~package/x.less` onto a vendored directory.
pub trait ImportPlugin: fmt::Debug + Send + Sync {
    /// Plugin name, used for equality and diagnostics
    fn name(&self) -> &str;

    /// Return a path if this plugin handles `candidate` imported from
    /// `current_dir`; `None` falls through to the default lookup.
    fn resolve_import(&self, candidate: &str, current_dir: &Path) -> Option<PathBuf>;
}

/// Options forwarded to the processor on every render
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Extra include paths, searched in order after the importing file's directory
    pub paths: Vec<PathBuf>,
    /// Variables injected before the source
    pub global_vars: BTreeMap<String, String>,
    /// Variables injected after the source (override declarations)
    pub modify_vars: BTreeMap<String, String>,
    /// Import plugins
    pub plugins: Vec<Arc<dyn ImportPlugin>>,
    /// Any other processor option, passed through untouched
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RenderOptions {
    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_global_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.global_vars.insert(name.into(), value.into());
        self
    }

    pub fn with_plugin(mut self, plugin: Arc<dyn ImportPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Look up an injected variable; `modify_vars` win over `global_vars`.
    pub fn variable(&self, name: &str) -> Option<&str> {
        let name = name.trim_start_matches('@');
        self.modify_vars
            .get(name)
            .or_else(|| self.global_vars.get(name))
            .map(String::as_str)
    }
}

impl PartialEq for RenderOptions {
    fn eq(&self, other: &Self) -> bool {
        self.paths == other.paths
            && self.global_vars == other.global_vars
            && self.modify_vars == other.modify_vars
            && self.extra == other.extra
            && self.plugins.len() == other.plugins.len()
            && self
                .plugins
                .iter()
                .zip(&other.plugins)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a.name() == b.name())
    }
}

/// One parsed source unit: the root or an expanded import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

/// What the processor reports back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedStylesheet {
    /// Conventional imports, transitively expanded
    pub imports: Vec<ImportRecord>,
    /// Every unit the processor parsed, root first
    pub sources: Vec<SourceUnit>,
}

/// Processor failures
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// A conventional import could not be located
    #[error("'{import}' wasn't found (imported from '{}'): {source}", .from.display())]
    ImportNotFound {
        import: String,
        from: PathBuf,
        #[source]
        source: ResolveError,
    },

    /// Interpolation referenced a variable nobody defined
    #[error("variable @{name} is undefined in '{}'", .file.display())]
    UndefinedVariable { name: String, file: PathBuf },

    /// Directive could not be parsed
    #[error("{message} in '{}' on line {line}", .file.display())]
    Syntax {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// An imported file could not be read
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: FsError,
    },

    /// Lookup hit a file system fault
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Failure reported by an external processor implementation
    #[error("{0}")]
    Other(String),
}

/// Stylesheet compiler front-end
pub trait StylesheetProcessor: Send + Sync {
    /// Parse `text` (the content of `path`) and expand its imports.
    fn render(
        &self,
        text: &str,
        path: &Path,
        options: &RenderOptions,
    ) -> Result<ProcessedStylesheet, ProcessorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named(&'static str);

    impl ImportPlugin for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn resolve_import(&self, _candidate: &str, _current_dir: &Path) -> Option<PathBuf> {
            None
        }
    }

    #[test]
    fn modify_vars_shadow_global_vars() {
        let mut options = RenderOptions::default().with_global_var("theme", "light");
        options
            .modify_vars
            .insert("theme".to_string(), "dark".to_string());
        assert_eq!(options.variable("@theme"), Some("dark"));
        assert_eq!(options.variable("missing"), None);
    }

    #[test]
    fn equality_compares_plugins_by_name() {
        let a = RenderOptions::default().with_plugin(Arc::new(Named("npm")));
        let b = RenderOptions::default().with_plugin(Arc::new(Named("npm")));
        let c = RenderOptions::default().with_plugin(Arc::new(Named("glob")));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clone_is_deep_for_paths() {
        let original = RenderOptions::default().with_paths(["/vendor", "/shared"]);
        let mut copy = original.clone();
        copy.paths.push(PathBuf::from("/extra"));
        assert_eq!(original.paths.len(), 2);
    }
}
