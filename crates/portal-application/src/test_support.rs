//! Hand-rolled test doubles shared by the application-layer tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::oneshot;

use portal_core::auth::{AuthService, AuthSession, Credentials, RegisterPayload};
use portal_core::error::{PortalError, Result};
use portal_core::nav::Navigator;
use portal_core::notify::{Notification, NotificationSink};
use portal_core::repository::SessionRepository;
use portal_core::session::SessionSnapshot;
use portal_core::user::{Role, User};

pub fn student() -> User {
    User {
        id: "1".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Obi".to_string(),
        email: "a@b.edu".to_string(),
        role: Role::Student,
        matric_number: Some("CSC/21/001".to_string()),
        staff_id: None,
        department: Some("Computer Science".to_string()),
        level: None,
    }
}

pub fn lecturer() -> User {
    User {
        id: "2".to_string(),
        first_name: "Tunde".to_string(),
        last_name: "Bello".to_string(),
        email: "tunde@school.edu".to_string(),
        role: Role::Lecturer,
        matric_number: None,
        staff_id: Some("STF-42".to_string()),
        department: Some("Physics".to_string()),
        level: None,
    }
}

/// Scripted auth service: results are queued per operation, and the mock
/// mirrors the real adapter's local credential behavior (storing the token
/// and identity on success, clearing both on logout).
#[derive(Default)]
pub struct MockAuthService {
    pub login_results: Mutex<VecDeque<Result<AuthSession>>>,
    pub register_results: Mutex<VecDeque<Result<AuthSession>>>,
    pub token: Mutex<Option<String>>,
    pub cached_user: Mutex<Option<User>>,
    pub logout_calls: AtomicUsize,
    pub resend_calls: AtomicUsize,
    /// When set, `login` waits on this gate before settling, so tests can
    /// observe in-flight state.
    pub login_gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockAuthService {
    pub fn with_login_result(result: Result<AuthSession>) -> Self {
        let mock = Self::default();
        mock.login_results.lock().unwrap().push_back(result);
        mock
    }

    pub fn queue_login(&self, result: Result<AuthSession>) {
        self.login_results.lock().unwrap().push_back(result);
    }

    pub fn queue_register(&self, result: Result<AuthSession>) {
        self.register_results.lock().unwrap().push_back(result);
    }

    /// Puts the mock into the inconsistent token-without-identity state.
    pub fn set_orphan_token(&self) {
        *self.token.lock().unwrap() = Some("orphan".to_string());
        *self.cached_user.lock().unwrap() = None;
    }

    pub fn set_credentials(&self, token: &str, user: User) {
        *self.token.lock().unwrap() = Some(token.to_string());
        *self.cached_user.lock().unwrap() = Some(user);
    }

    fn settle(&self, result: Result<AuthSession>) -> Result<AuthSession> {
        if let Ok(session) = &result {
            self.set_credentials(&session.token, session.user.clone());
        }
        result
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn login(&self, _credentials: Credentials) -> Result<AuthSession> {
        let gate = self.login_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let result = self
            .login_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortalError::internal("no scripted login result")));
        self.settle(result)
    }

    async fn register(&self, _payload: RegisterPayload) -> Result<AuthSession> {
        let result = self
            .register_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortalError::internal("no scripted register result")));
        self.settle(result)
    }

    fn logout(&self) {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        *self.token.lock().unwrap() = None;
        *self.cached_user.lock().unwrap() = None;
    }

    fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    fn current_user(&self) -> Option<User> {
        self.cached_user.lock().unwrap().clone()
    }

    async fn verify_email(&self, _token: &str) -> Result<()> {
        Ok(())
    }

    async fn resend_verification_email(&self, _email: &str) -> Result<()> {
        self.resend_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Notification sink that records everything it is asked to show.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.lock().unwrap().last().cloned()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Navigator that counts login redirects.
#[derive(Default)]
pub struct RecordingNavigator {
    pub to_login_calls: AtomicUsize,
}

impl RecordingNavigator {
    pub fn login_navigations(&self) -> usize {
        self.to_login_calls.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn to_login(&self) {
        self.to_login_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-memory session repository with a save counter.
#[derive(Default)]
pub struct MemorySessionRepository {
    pub record: Mutex<Option<SessionSnapshot>>,
    pub save_calls: AtomicUsize,
}

impl MemorySessionRepository {
    pub fn with_record(snapshot: SessionSnapshot) -> Self {
        Self {
            record: Mutex::new(Some(snapshot)),
            save_calls: AtomicUsize::new(0),
        }
    }

    pub fn saved(&self) -> Option<SessionSnapshot> {
        self.record.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn load(&self) -> Result<Option<SessionSnapshot>> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        *self.record.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}
