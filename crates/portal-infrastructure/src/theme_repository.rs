//! File-backed theme preference persistence.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use portal_core::error::Result;
use portal_core::repository::ThemeRepository;
use portal_core::theme::ThemeMode;

use crate::dto::ThemeRecordV1;
use crate::paths::PortalPaths;
use crate::storage::AtomicJsonFile;

/// Theme repository backed by `theme-storage.json`.
#[derive(Clone)]
pub struct FileThemeRepository {
    file: Arc<AtomicJsonFile<ThemeRecordV1>>,
}

impl FileThemeRepository {
    /// Creates a repository at the standard storage location.
    pub fn new(paths: &PortalPaths) -> Result<Self> {
        Ok(Self::with_path(paths.theme_file()?))
    }

    /// Creates a repository at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }
}

#[async_trait]
impl ThemeRepository for FileThemeRepository {
    async fn load(&self) -> Result<Option<ThemeMode>> {
        let record = match self.file.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("unreadable theme record, treating as absent: {}", e);
                return Ok(None);
            }
        };

        match record {
            Some(record) if record.version_supported() => Ok(Some(record.mode)),
            Some(record) => {
                tracing::warn!(
                    version = %record.schema_version,
                    "theme record has unsupported schema version, treating as absent"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, mode: ThemeMode) -> Result<()> {
        self.file.save(&ThemeRecordV1::new(mode))
    }
}
