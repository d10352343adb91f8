//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::ports::Diagnostic;
use crate::error::ConfigError;

use super::types::Config;

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "lessdeps.toml";

/// Load configuration and collect non-fatal warnings (unknown keys).
///
/// Relative paths in the file are taken relative to the file's directory.
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<Diagnostic>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|key| {
            let leaf = key.rsplit('.').next().unwrap_or(key.as_str()).to_string();
            Diagnostic::ConfigWarning {
                suggestion: suggest_key(&leaf),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    let config = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => config.relative_to(dir),
        _ => config,
    };

    Ok((config, warnings))
}

/// Load from project config, user config, or defaults
pub fn load_or_default(
    project_root: Option<&Path>,
    mut on_warning: impl FnMut(Diagnostic),
) -> Result<Config, ConfigError> {
    let candidates = project_root
        .map(|root| root.join(CONFIG_FILE_NAME))
        .into_iter()
        .chain(dirs::config_dir().map(|d| d.join("lessdeps").join("config.toml")));

    for path in candidates {
        if path.is_file() {
            let (config, warnings) = load_with_warnings(&path)?;
            warnings.into_iter().for_each(&mut on_warning);
            return Ok(with_env_overrides(config));
        }
    }

    Ok(with_env_overrides(Config::default()))
}

/// Apply environment variable overrides (LESSDEPS_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    apply_overrides(config, |name| std::env::var_os(name))
}

pub(crate) fn apply_overrides(
    mut config: Config,
    var: impl Fn(&str) -> Option<std::ffi::OsString>,
) -> Config {
    // LESSDEPS_CACHE_DIR
    if let Some(dir) = var("LESSDEPS_CACHE_DIR").filter(|d| !d.is_empty()) {
        config.cache.dir = Some(PathBuf::from(dir));
    }

    // LESSDEPS_EVIDENCE (unknown values are ignored)
    if let Some(kind) = var("LESSDEPS_EVIDENCE")
        .and_then(|v| v.into_string().ok())
        .and_then(|v| v.parse().ok())
    {
        config.cache.evidence = kind;
    }

    // LESSDEPS_PATHS (platform path-list separator)
    if let Some(paths) = var("LESSDEPS_PATHS").filter(|p| !p.is_empty()) {
        config.resolver.paths = std::env::split_paths(&paths).collect();
    }

    config
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "resolver",
        "paths",
        "global_vars",
        "modify_vars",
        "options",
        "cache",
        "dir",
        "evidence",
    ];

    let mut best: Option<(&str, usize)> = None;
    for &candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
