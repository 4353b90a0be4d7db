//! Persistence ports for the durable client-side records.
//!
//! Two independent blobs exist: the session record (`auth-storage`) and the
//! theme preference (`theme-storage`). Each is written wholesale on every
//! mutation. Implementations live in the infrastructure layer.

use async_trait::async_trait;

use crate::error::Result;
use crate::session::SessionSnapshot;
use crate::theme::ThemeMode;

/// Port for the persisted session record.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Loads the persisted record. `Ok(None)` means no usable record exists
    /// (missing file, or a schema version this build does not understand).
    async fn load(&self) -> Result<Option<SessionSnapshot>>;

    /// Writes the record wholesale.
    async fn save(&self, snapshot: &SessionSnapshot) -> Result<()>;

    /// Removes the record. Safe to call when nothing is stored.
    async fn clear(&self) -> Result<()>;
}

/// Port for the persisted theme preference.
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Loads the preference, falling back to the default when absent or
    /// unreadable.
    async fn load(&self) -> Result<Option<ThemeMode>>;

    /// Writes the preference wholesale.
    async fn save(&self, mode: ThemeMode) -> Result<()>;
}
