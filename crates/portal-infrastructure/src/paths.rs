//! Unified path management for portal client storage.
//!
//! All durable client-side records live under one configuration directory.
//! Tests pass a base override so nothing touches the real home directory.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/campus-portal/     # Config directory
//! ├── portal.toml              # Client configuration (API base URL)
//! ├── auth-storage.json        # Persisted session record
//! ├── theme-storage.json       # Persisted theme preference
//! ├── auth-token               # Opaque credential token
//! └── auth-user.json           # Cached identity for the stored token
//! ```

use std::path::PathBuf;

use portal_core::error::{PortalError, Result};

const APP_DIR: &str = "campus-portal";

/// Resolves every storage path the client uses.
#[derive(Debug, Clone)]
pub struct PortalPaths {
    /// When set, all paths resolve under this directory instead of the
    /// platform config directory. Used by tests.
    base_override: Option<PathBuf>,
}

impl PortalPaths {
    /// Creates a path resolver. Pass `None` for the platform default
    /// (e.g. `~/.config/campus-portal/` on Linux).
    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Returns the portal configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf> {
        if let Some(base) = &self.base_override {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PortalError::config("cannot determine config directory"))
    }

    /// Path to the client configuration file.
    pub fn config_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("portal.toml"))
    }

    /// Path to the persisted session record.
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("auth-storage.json"))
    }

    /// Path to the persisted theme preference.
    pub fn theme_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("theme-storage.json"))
    }

    /// Path to the opaque credential token.
    pub fn token_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("auth-token"))
    }

    /// Path to the cached identity record.
    pub fn cached_user_file(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("auth-user.json"))
    }
}

impl Default for PortalPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let paths = PortalPaths::new(Some(PathBuf::from("/tmp/portal-test")));
        assert_eq!(
            paths.session_file().unwrap(),
            PathBuf::from("/tmp/portal-test/auth-storage.json")
        );
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/portal-test/portal.toml")
        );
    }

    #[test]
    fn test_default_paths_end_with_app_dir() {
        let paths = PortalPaths::default();
        if let Ok(dir) = paths.config_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
