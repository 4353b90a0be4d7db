//! The persisted session store.
//!
//! Owns the process-wide session state: who is signed in, the derived
//! authenticated flag, and the loading flag covering in-flight login and
//! registration calls. Every mutation goes through the operations here and
//! is persisted wholesale to the session record; consumers read snapshots
//! and never assign fields directly.
//!
//! Error policy: `login`, `register` and the email flows are committing
//! operations. They emit exactly one notification for the outcome and then
//! return the failure to the caller, so page-level flows can skip their
//! post-login navigation. Read-style operations belong in the request
//! executor, which never propagates.

use std::sync::Arc;

use tokio::sync::RwLock;

use portal_core::auth::{AuthService, Credentials, RegisterData, RegisterPayload};
use portal_core::error::Result;
use portal_core::notify::{Notification, NotificationSink};
use portal_core::repository::SessionRepository;
use portal_core::session::SessionState;
use portal_core::user::{Role, User};

/// Product-level switches for the registration mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterPolicy {
    /// Whether a student's academic level is sent at registration. The
    /// portal has historically never populated it, so the default stays
    /// `false` until the product rule is confirmed.
    pub include_student_level: bool,
}

/// The process-wide session store.
pub struct SessionStore {
    state: RwLock<SessionState>,
    auth: Arc<dyn AuthService>,
    repository: Arc<dyn SessionRepository>,
    notifier: Arc<dyn NotificationSink>,
    policy: RegisterPolicy,
}

impl SessionStore {
    /// Creates a store in the anonymous state.
    pub fn new(
        auth: Arc<dyn AuthService>,
        repository: Arc<dyn SessionRepository>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state: RwLock::new(SessionState::new()),
            auth,
            repository,
            notifier,
            policy: RegisterPolicy::default(),
        }
    }

    /// Overrides the registration policy.
    pub fn with_policy(mut self, policy: RegisterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// The signed-in identity, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.is_authenticated
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Loads the persisted session record into memory. Called once at
    /// startup, before the guard's reconciliation runs.
    ///
    /// The authenticated flag is re-derived from the stored user rather
    /// than trusted: a record claiming authentication without an identity
    /// rehydrates as anonymous.
    pub async fn hydrate(&self) {
        match self.repository.load().await {
            Ok(Some(snapshot)) => {
                let mut state = self.state.write().await;
                state.apply_user(snapshot.user);
                tracing::debug!(
                    authenticated = state.is_authenticated,
                    "session rehydrated from storage"
                );
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("failed to rehydrate session, staying anonymous: {}", e);
            }
        }
    }

    /// Exchanges credentials for a session.
    ///
    /// On failure the prior user and authenticated flag are untouched; only
    /// the loading flag is cleared, one error notification fires, and the
    /// failure is returned to the caller.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<()> {
        self.set_loading(true).await;

        let outcome = self
            .auth
            .login(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await;

        match outcome {
            Ok(session) => {
                if session.user.role != role {
                    tracing::warn!(
                        requested = %role,
                        actual = %session.user.role,
                        "signed in with a different role than requested"
                    );
                }
                {
                    let mut state = self.state.write().await;
                    state.apply_user(Some(session.user));
                    state.is_loading = false;
                }
                self.persist().await;
                self.notifier.notify(Notification::success("Login successful"));
                Ok(())
            }
            Err(e) => {
                self.set_loading(false).await;
                self.notifier.notify(Notification::error(e.display_message()));
                Err(e)
            }
        }
    }

    /// Registers a new account and signs it in. Same outcome handling as
    /// [`Self::login`].
    pub async fn register(&self, data: RegisterData) -> Result<()> {
        self.set_loading(true).await;

        let payload = self.shape_payload(data);
        let outcome = self.auth.register(payload).await;

        match outcome {
            Ok(session) => {
                {
                    let mut state = self.state.write().await;
                    state.apply_user(Some(session.user));
                    state.is_loading = false;
                }
                self.persist().await;
                self.notifier
                    .notify(Notification::success("Registration successful"));
                Ok(())
            }
            Err(e) => {
                self.set_loading(false).await;
                self.notifier.notify(Notification::error(e.display_message()));
                Err(e)
            }
        }
    }

    /// Signs out. Idempotent: calling this while anonymous leaves the state
    /// unchanged, and the notification still fires exactly once per call.
    pub async fn logout(&self) {
        self.auth.logout();
        {
            let mut state = self.state.write().await;
            state.apply_user(None);
            state.is_loading = false;
        }
        self.persist().await;
        self.notifier.notify(Notification::info("Logged out"));
    }

    /// Directly replaces the signed-in identity. Reserved for the guard's
    /// reconciliation; touches no network and emits no notification.
    pub async fn set_user(&self, user: Option<User>) {
        {
            let mut state = self.state.write().await;
            state.apply_user(user);
        }
        self.persist().await;
    }

    /// Confirms an email address. Committing: notifies, then returns the
    /// outcome to the caller.
    pub async fn verify_email(&self, token: &str) -> Result<()> {
        match self.auth.verify_email(token).await {
            Ok(()) => {
                self.notifier.notify(Notification::success("Email verified"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.display_message()));
                Err(e)
            }
        }
    }

    /// Asks the server to re-send the verification email.
    pub async fn resend_verification_email(&self, email: &str) -> Result<()> {
        match self.auth.resend_verification_email(email).await {
            Ok(()) => {
                self.notifier
                    .notify(Notification::success("Verification email sent"));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.display_message()));
                Err(e)
            }
        }
    }

    /// Shapes the generic registration input into the role-specific wire
    /// payload. Student-only fields never leave the client for other roles;
    /// the level is withheld unless the policy opts in.
    fn shape_payload(&self, data: RegisterData) -> RegisterPayload {
        let is_student = data.role.is_student();
        RegisterPayload {
            email: data.email,
            password: data.password,
            first_name: data.first_name,
            last_name: data.last_name,
            role: data.role,
            department: data.department,
            level: if is_student && self.policy.include_student_level {
                data.level
            } else {
                None
            },
            matric_number: if is_student { data.matric_number } else { None },
        }
    }

    async fn set_loading(&self, loading: bool) {
        self.state.write().await.is_loading = loading;
    }

    async fn persist(&self) {
        let snapshot = self.state.read().await.snapshot();
        if let Err(e) = self.repository.save(&snapshot).await {
            tracing::warn!("failed to persist session record: {}", e);
        }
    }
}
