//! Session domain models.
//!
//! The session is the process-wide record of who is signed in. The
//! authenticated flag is derived state: it must equal `user.is_some()` after
//! every operation, which is why mutation goes through [`SessionState::apply_user`]
//! rather than field assignment.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// In-memory session state owned by the session store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The signed-in identity, if any.
    pub user: Option<User>,
    /// Derived from `user`; kept as a field because it is persisted and
    /// read without the user record.
    pub is_authenticated: bool,
    /// True only while a login or registration call is in flight.
    pub is_loading: bool,
}

impl SessionState {
    /// Creates the anonymous, idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the signed-in identity, keeping the authenticated flag in
    /// step. This is the only way session code changes `user`.
    pub fn apply_user(&mut self, user: Option<User>) {
        self.is_authenticated = user.is_some();
        self.user = user;
    }

    /// Whether the derived-flag invariant currently holds.
    pub fn invariant_holds(&self) -> bool {
        self.is_authenticated == self.user.is_some()
    }

    /// The persisted projection of this state. Loading is transient and
    /// never written to storage.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
        }
    }
}

/// The durable projection of the session, written wholesale on every
/// mutation and rehydrated at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_authenticated: bool,
}

impl SessionSnapshot {
    /// The anonymous snapshot.
    pub fn anonymous() -> Self {
        Self::default()
    }
}
