//! Local credential storage for the auth service adapter.
//!
//! Holds the opaque token (`auth-token`) and the cached identity it resolves
//! to (`auth-user.json`). These records belong to the adapter alone; the
//! session store persists its own record separately.
//!
//! Reads are synchronous lookups: `is_authenticated` and `current_user` are
//! called on the startup path before any rendering and must not wait on a
//! network call.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use portal_core::auth::CredentialStore;
use portal_core::error::Result;
use portal_core::user::User;

use crate::paths::PortalPaths;
use crate::storage::AtomicJsonFile;

/// File-backed credential store.
#[derive(Clone)]
pub struct FileCredentialStore {
    token_path: PathBuf,
    user_file: Arc<AtomicJsonFile<User>>,
}

impl FileCredentialStore {
    /// Creates a store at the standard storage location.
    pub fn new(paths: &PortalPaths) -> Result<Self> {
        Ok(Self::with_paths(
            paths.token_file()?,
            paths.cached_user_file()?,
        ))
    }

    /// Creates a store with custom paths (for testing).
    pub fn with_paths(token_path: PathBuf, user_path: PathBuf) -> Self {
        Self {
            token_path,
            user_file: Arc::new(AtomicJsonFile::new(user_path)),
        }
    }

    fn write_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.token_path, token)?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn store(&self, token: &str, user: &User) -> Result<()> {
        self.write_token(token)?;
        self.user_file.save(user)
    }

    fn token(&self) -> Option<String> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) if !token.trim().is_empty() => Some(token),
            Ok(_) => None,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("failed to read stored token: {}", e);
                None
            }
        }
    }

    fn cached_user(&self) -> Option<User> {
        match self.user_file.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("failed to read cached user: {}", e);
                None
            }
        }
    }

    fn clear(&self) {
        if self.token_path.exists() {
            if let Err(e) = fs::remove_file(&self.token_path) {
                tracing::warn!("failed to remove stored token: {}", e);
            }
        }
        if let Err(e) = self.user_file.remove() {
            tracing::warn!("failed to remove cached user: {}", e);
        }
    }
}
