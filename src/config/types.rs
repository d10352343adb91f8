//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ports::{Diagnostic, RenderOptions};
use crate::domain::value_objects::EvidenceKind;
use crate::error::ConfigError;

use super::loader;

/// Options forwarded to the stylesheet processor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Extra search paths, tried in order after the importing file's directory
    pub paths: Vec<PathBuf>,

    /// Variables visible before the stylesheet's own declarations
    pub global_vars: BTreeMap<String, String>,

    /// Variables that override the stylesheet's own declarations
    pub modify_vars: BTreeMap<String, String>,

    /// Any other processor option, forwarded untouched
    pub options: BTreeMap<String, toml::Value>,
}

impl ResolverConfig {
    /// Render options for the processor.
    ///
    /// Variable names may be written with or without the leading `@`.
    pub fn render_options(&self) -> RenderOptions {
        let strip = |vars: &BTreeMap<String, String>| {
            vars.iter()
                .map(|(k, v)| (k.trim_start_matches('@').to_string(), v.clone()))
                .collect()
        };

        RenderOptions {
            paths: self.paths.clone(),
            global_vars: strip(&self.global_vars),
            modify_vars: strip(&self.modify_vars),
            plugins: Vec::new(),
            extra: self
                .options
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        }
    }
}

/// Change-detection cache configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry directory; `None` means the per-user cache directory
    pub dir: Option<PathBuf>,

    /// What to compare between passes
    pub evidence: EvidenceKind,
}

impl CacheConfig {
    /// The configured directory, or the default one
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(default_cache_dir)
    }
}

/// `<user cache dir>/lessdeps`, or `.lessdeps-cache` when there is no
/// user cache directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("lessdeps"))
        .unwrap_or_else(|| PathBuf::from(".lessdeps-cache"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> Result<(Self, Vec<Diagnostic>), ConfigError> {
        loader::load_with_warnings(path)
    }

    /// Project config, then user config, then defaults; environment
    /// overrides applied last. Warnings go to `on_warning`.
    pub fn load_or_default(
        project_root: Option<&Path>,
        on_warning: impl FnMut(Diagnostic),
    ) -> Result<Self, ConfigError> {
        loader::load_or_default(project_root, on_warning)
    }

    /// Apply `LESSDEPS_*` environment variables
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Make relative paths relative to `dir` (the config file's directory).
    pub fn relative_to(mut self, dir: &Path) -> Self {
        for path in &mut self.resolver.paths {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
        if let Some(cache_dir) = &mut self.cache.dir {
            if cache_dir.is_relative() {
                *cache_dir = dir.join(&*cache_dir);
            }
        }
        self
    }
}

fn toml_to_json(value: &toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s.clone()),
        toml::Value::Integer(i) => serde_json::Value::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        toml::Value::Boolean(b) => serde_json::Value::Bool(*b),
        toml::Value::Datetime(d) => serde_json::Value::String(d.to_string()),
        toml::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
    }
}
