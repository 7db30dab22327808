use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::storage::CacheConfig;

/// Server configuration, loaded from an optional TOML file. Every
/// field has a default so an empty file (or none at all) yields a
/// working server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root directory holding one subdirectory per cloned repository.
    pub repos_dir: PathBuf,
    /// Repositories that must sit on a specific branch before
    /// detection, keyed by repository name.
    pub branch_overrides: HashMap<String, String>,
    pub cache: CacheSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            repos_dir: PathBuf::from("cloned-repositories"),
            branch_overrides: HashMap::new(),
            cache: CacheSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a TOML file, or fall back to defaults when no path is
    /// given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("invalid config file {}", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSettings {
    pub max_size_bytes: u64,
    pub max_entries: usize,
    pub content_ttl_secs: u64,
    pub file_tree_ttl_secs: u64,
    pub file_tree_capacity: usize,
    pub max_cacheable_file_bytes: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            max_size_bytes: defaults.max_cache_size,
            max_entries: defaults.max_cache_entries,
            content_ttl_secs: defaults.content_ttl.as_secs(),
            file_tree_ttl_secs: defaults.file_tree_ttl.as_secs(),
            file_tree_capacity: defaults.file_tree_capacity,
            max_cacheable_file_bytes: defaults.max_cacheable_file_size,
        }
    }
}

impl From<CacheSettings> for CacheConfig {
    fn from(settings: CacheSettings) -> Self {
        Self {
            max_cache_size: settings.max_size_bytes,
            max_cache_entries: settings.max_entries,
            content_ttl: Duration::from_secs(settings.content_ttl_secs),
            file_tree_ttl: Duration::from_secs(settings.file_tree_ttl_secs),
            file_tree_capacity: settings.file_tree_capacity,
            max_cacheable_file_size: settings.max_cacheable_file_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_a_file() {
        let config = ServerConfig::load(None).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.repos_dir, PathBuf::from("cloned-repositories"));
        assert!(config.branch_overrides.is_empty());
    }

    #[test]
    fn parses_overrides_and_cache_tuning() {
        let raw = r#"
            port = 8080
            repos_dir = "/srv/repos"

            [branch_overrides]
            dashboards = "release"

            [cache]
            max_entries = 10
            content_ttl_secs = 60
        "#;
        let config: ServerConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.branch_overrides.get("dashboards").map(String::as_str),
            Some("release")
        );

        let cache: CacheConfig = config.cache.into();
        assert_eq!(cache.max_cache_entries, 10);
        assert_eq!(cache.content_ttl, Duration::from_secs(60));
        // untouched fields keep their defaults
        assert_eq!(cache.max_cache_size, 100 * 1024 * 1024);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<ServerConfig, _> = toml::from_str("tpyo = true");
        assert!(result.is_err());
    }
}
