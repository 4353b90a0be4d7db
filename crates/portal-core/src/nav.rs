//! Navigation port.
//!
//! Routing is outside this core; the only navigation the session lifecycle
//! needs is "send the user to the login entry point", which both the
//! bootstrap fail-closed path and the unauthorized handler trigger.

/// Port for the navigation actions the auth lifecycle performs.
pub trait Navigator: Send + Sync {
    /// Navigates to the login entry point.
    fn to_login(&self);
}
