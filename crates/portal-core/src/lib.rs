//! Domain layer for the Campus Portal client.
//!
//! Holds the domain models (user, session, theme), the shared error type,
//! and the ports the application layer programs against: the remote auth
//! service, credential and record storage, notifications, navigation, and
//! the process-wide auth event channel.

pub mod auth;
pub mod error;
pub mod events;
pub mod nav;
pub mod notify;
pub mod repository;
pub mod session;
pub mod theme;
pub mod user;

// Re-export common error type
pub use error::{PortalError, Result};
