//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of the durable client-side
//! records. They are private to the infrastructure layer and carry an
//! explicit `schema_version` field; a record whose version this build does
//! not understand is treated as absent on load (fail closed), never
//! partially interpreted.
//!
//! ### Session record version history
//! - **1.0.0**: Initial schema (`user`, `is_authenticated`).
//!
//! ### Theme record version history
//! - **1.0.0**: Initial schema (`mode`).

use serde::{Deserialize, Serialize};

use portal_core::session::SessionSnapshot;
use portal_core::theme::ThemeMode;
use portal_core::user::User;

/// Current schema version for the persisted session record.
pub const SESSION_RECORD_VERSION: &str = "1.0.0";

/// Current schema version for the persisted theme record.
pub const THEME_RECORD_VERSION: &str = "1.0.0";

/// The persisted shape of the `auth-storage` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecordV1 {
    /// The schema version of this data structure.
    pub schema_version: String,

    /// The signed-in identity, if any.
    pub user: Option<User>,
    /// Derived authentication flag, persisted alongside the user.
    pub is_authenticated: bool,
}

impl SessionRecordV1 {
    /// Whether this record was written by a schema this build understands.
    pub fn version_supported(&self) -> bool {
        self.schema_version == SESSION_RECORD_VERSION
    }
}

/// Convert the domain snapshot to the persisted record.
impl From<&SessionSnapshot> for SessionRecordV1 {
    fn from(snapshot: &SessionSnapshot) -> Self {
        Self {
            schema_version: SESSION_RECORD_VERSION.to_string(),
            user: snapshot.user.clone(),
            is_authenticated: snapshot.is_authenticated,
        }
    }
}

/// Convert the persisted record to the domain snapshot.
impl From<SessionRecordV1> for SessionSnapshot {
    fn from(record: SessionRecordV1) -> Self {
        Self {
            user: record.user,
            is_authenticated: record.is_authenticated,
        }
    }
}

/// The persisted shape of the `theme-storage` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecordV1 {
    /// The schema version of this data structure.
    pub schema_version: String,

    /// The selected theme.
    pub mode: ThemeMode,
}

impl ThemeRecordV1 {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            schema_version: THEME_RECORD_VERSION.to_string(),
            mode,
        }
    }

    /// Whether this record was written by a schema this build understands.
    pub fn version_supported(&self) -> bool {
        self.schema_version == THEME_RECORD_VERSION
    }
}
