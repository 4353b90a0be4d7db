//! File-backed session record persistence.
//!
//! Persists the session snapshot to `auth-storage.json`, written wholesale
//! on every session mutation and read back once at startup. A record with
//! an unknown schema version loads as absent, so a downgrade or corruption
//! can only ever cost a sign-in, never grant one.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use portal_core::error::{PortalError, Result};
use portal_core::repository::SessionRepository;
use portal_core::session::SessionSnapshot;

use crate::dto::SessionRecordV1;
use crate::paths::PortalPaths;
use crate::storage::AtomicJsonFile;

/// Session repository backed by an atomically written JSON file.
#[derive(Clone)]
pub struct FileSessionRepository {
    file: Arc<AtomicJsonFile<SessionRecordV1>>,
}

impl FileSessionRepository {
    /// Creates a repository at the standard storage location.
    pub fn new(paths: &PortalPaths) -> Result<Self> {
        Ok(Self::with_path(paths.session_file()?))
    }

    /// Creates a repository at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }
}

#[async_trait]
impl SessionRepository for FileSessionRepository {
    async fn load(&self) -> Result<Option<SessionSnapshot>> {
        let record = match self.file.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("unreadable session record, treating as absent: {}", e);
                return Ok(None);
            }
        };

        match record {
            Some(record) if record.version_supported() => Ok(Some(record.into())),
            Some(record) => {
                tracing::warn!(
                    version = %record.schema_version,
                    "session record has unsupported schema version, treating as absent"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let record = SessionRecordV1::from(snapshot);
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || file.save(&record))
            .await
            .map_err(|e| PortalError::internal(format!("failed to join save task: {}", e)))?
    }

    async fn clear(&self) -> Result<()> {
        self.file.remove()
    }
}
