//! Infrastructure layer for the Campus Portal client.
//!
//! File-backed implementations of the persistence and presentation ports:
//! the versioned session and theme records, the adapter's credential
//! storage, client configuration, and the logging-backed notification and
//! navigation defaults.

pub mod config_service;
pub mod credential_storage;
pub mod dto;
pub mod navigation;
pub mod notifier;
pub mod paths;
pub mod session_repository;
pub mod storage;
pub mod theme_repository;

pub use config_service::{ApiConfig, ConfigService, PortalConfig};
pub use credential_storage::FileCredentialStore;
pub use navigation::TracingNavigator;
pub use notifier::TracingNotifier;
pub use paths::PortalPaths;
pub use session_repository::FileSessionRepository;
pub use theme_repository::FileThemeRepository;
