//! Configuration service implementation.
//!
//! Loads the client configuration from `portal.toml` in the portal config
//! directory, writing the default file when none exists, and caches the
//! result to avoid repeated file I/O.

use std::fs;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use portal_core::error::Result;

use crate::paths::PortalPaths;

fn default_base_url() -> String {
    "http://localhost:4000/api".to_string()
}

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the remote portal API, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

/// Configuration service that loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    paths: PortalPaths,
    /// Cached configuration loaded from file.
    /// Uses RwLock for thread-safe lazy loading.
    config: Arc<RwLock<Option<PortalConfig>>>,
}

impl ConfigService {
    /// Creates a new ConfigService.
    ///
    /// The configuration is loaded lazily on first access to avoid blocking
    /// during initialization.
    pub fn new(paths: PortalPaths) -> Self {
        Self {
            paths,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// When no configuration file exists the default configuration is
    /// written and returned, so the file is there for the user to edit.
    pub fn get_config(&self) -> PortalConfig {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap();
            if let Some(ref cached) = *read_lock {
                return cached.clone();
            }
        }

        let loaded = self.load_config().unwrap_or_else(|e| {
            tracing::warn!("failed to load configuration, using defaults: {}", e);
            PortalConfig::default()
        });

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap();
            *write_lock = Some(loaded.clone());
        }

        loaded
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap();
        *write_lock = None;
    }

    fn load_config(&self) -> Result<PortalConfig> {
        let path = self.paths.config_file()?;

        if !path.exists() {
            let default_config = PortalConfig::default();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, toml::to_string_pretty(&default_config)?)?;
            tracing::info!(path = %path.display(), "wrote default configuration");
            return Ok(default_config);
        }

        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service(dir: &TempDir) -> ConfigService {
        ConfigService::new(PortalPaths::new(Some(dir.path().to_path_buf())))
    }

    #[test]
    fn test_missing_file_yields_default_and_writes_it() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        let config = service.get_config();
        assert_eq!(config.api.base_url, default_base_url());
        assert!(dir.path().join("portal.toml").exists());
    }

    #[test]
    fn test_existing_file_is_read() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("portal.toml"),
            "[api]\nbase_url = \"https://portal.school.edu/api\"\n",
        )
        .unwrap();
        let service = service(&dir);
        assert_eq!(
            service.get_config().api.base_url,
            "https://portal.school.edu/api"
        );
    }

    #[test]
    fn test_invalidate_cache_forces_reload() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir);
        assert_eq!(service.get_config().api.base_url, default_base_url());

        std::fs::write(
            dir.path().join("portal.toml"),
            "[api]\nbase_url = \"https://other.school.edu/api\"\n",
        )
        .unwrap();
        // Cached value until invalidated.
        assert_eq!(service.get_config().api.base_url, default_base_url());
        service.invalidate_cache();
        assert_eq!(
            service.get_config().api.base_url,
            "https://other.school.edu/api"
        );
    }
}
