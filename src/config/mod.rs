//! Configuration
//!
//! Layering, lowest to highest priority:
//! 1. Built-in defaults
//! 2. User config (`<config dir>/lessdeps/config.toml`)
//! 3. Project config (`lessdeps.toml` in the project root)
//! 4. Environment variables (`LESSDEPS_*`)
//!
//! Only the first config file found is read; files are not merged.

mod loader;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use types::{default_cache_dir, CacheConfig, Config, ResolverConfig};
