//! Auth bootstrap and route guarding.
//!
//! At startup the guard reconciles the rehydrated session against the
//! locally stored credentials, then publishes its readiness over a watch
//! channel so screens can hold their first render until the verdict is in.
//! Afterwards it owns the unauthorized signal: any rejected call anywhere
//! in the client funnels through [`AuthGuard::handle_unauthorized`].

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use portal_core::auth::AuthService;
use portal_core::events::{AuthEvent, AuthEvents};
use portal_core::nav::Navigator;
use portal_core::notify::{Notification, NotificationSink};

use crate::session_store::SessionStore;

/// Message shown when a stored session is rejected by the server.
const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please sign in again.";

/// Lifecycle of the guard, published over a watch channel.
///
/// Reconciliation always lands in `Ready`, on failure as well as success;
/// there is no transition back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Reconciliation has not started. Screens should hold rendering.
    Uninitialized,
    /// Reconciliation is in flight.
    Initializing,
    /// Reconciliation finished; the session store is authoritative.
    Ready,
}

/// Reconciles persisted state at startup and reacts to unauthorized
/// signals for the rest of the process lifetime.
pub struct AuthGuard {
    session: Arc<SessionStore>,
    auth: Arc<dyn AuthService>,
    events: AuthEvents,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    state: watch::Sender<GuardState>,
    cancel: CancellationToken,
}

impl AuthGuard {
    pub fn new(
        session: Arc<SessionStore>,
        auth: Arc<dyn AuthService>,
        events: AuthEvents,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (state, _) = watch::channel(GuardState::Uninitialized);
        Self {
            session,
            auth,
            events,
            notifier,
            navigator,
            state,
            cancel: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> GuardState {
        *self.state.borrow()
    }

    /// A receiver that observes guard state transitions.
    pub fn watch(&self) -> watch::Receiver<GuardState> {
        self.state.subscribe()
    }

    /// Waits until reconciliation has finished. Returns immediately once
    /// the guard is ready, including for late subscribers.
    pub async fn wait_ready(&self) {
        let mut rx = self.state.subscribe();
        while *rx.borrow_and_update() != GuardState::Ready {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// One-shot startup reconciliation.
    ///
    /// The locally stored token is authoritative over the rehydrated
    /// session record: no token means the session starts anonymous, and a
    /// token whose cached identity is missing is inconsistent state that
    /// gets repaired by clearing both and routing to the login screen.
    /// Success and failure both land in `Ready`; later calls only log.
    pub async fn initialize(&self) {
        if self.state() != GuardState::Uninitialized {
            tracing::debug!("auth guard already initialized, skipping");
            return;
        }
        self.state.send_replace(GuardState::Initializing);

        if self.auth.is_authenticated() {
            match self.auth.current_user() {
                Some(user) => {
                    tracing::info!(user = %user.display_name(), "restored signed-in session");
                    self.session.set_user(Some(user)).await;
                }
                None => {
                    // Token without a resolvable identity. Unusable.
                    tracing::warn!("stored token has no identity, clearing session");
                    self.auth.logout();
                    self.session.set_user(None).await;
                    self.navigator.to_login();
                }
            }
        } else {
            if self.session.current_user().await.is_some() {
                tracing::info!("session record has no matching token, starting anonymous");
            }
            self.session.set_user(None).await;
        }

        self.state.send_replace(GuardState::Ready);
    }

    /// Reacts to a rejected call: drops the session, tells the user why,
    /// and routes to the login screen.
    pub async fn handle_unauthorized(&self) {
        self.auth.logout();
        self.session.set_user(None).await;
        self.notifier.notify(Notification::info(SESSION_EXPIRED_MESSAGE));
        self.navigator.to_login();
    }

    /// Spawns the background task that funnels unauthorized events into
    /// [`Self::handle_unauthorized`]. Runs until [`Self::shutdown`].
    pub fn spawn_unauthorized_watcher(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let guard = self.clone();
        let mut events = self.events.subscribe();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = events.recv() => match received {
                        Ok(AuthEvent::Unauthorized) => guard.handle_unauthorized().await,
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                            // Coalescing is fine, one logout covers them all.
                            tracing::debug!(missed, "unauthorized events coalesced");
                            guard.handle_unauthorized().await;
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!("unauthorized watcher stopped");
        })
    }

    /// Stops the watcher task. Idempotent.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for AuthGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use portal_core::notify::NotificationLevel;
    use portal_core::session::SessionSnapshot;
    use std::time::Duration;

    struct Fixture {
        auth: Arc<MockAuthService>,
        repository: Arc<MemorySessionRepository>,
        notifier: Arc<RecordingNotifier>,
        navigator: Arc<RecordingNavigator>,
        events: AuthEvents,
        guard: Arc<AuthGuard>,
    }

    fn fixture() -> Fixture {
        fixture_with(MockAuthService::default(), MemorySessionRepository::default())
    }

    fn fixture_with(auth: MockAuthService, repository: MemorySessionRepository) -> Fixture {
        let auth = Arc::new(auth);
        let repository = Arc::new(repository);
        let notifier = Arc::new(RecordingNotifier::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let events = AuthEvents::new();
        let session = Arc::new(SessionStore::new(
            auth.clone(),
            repository.clone(),
            notifier.clone(),
        ));
        let guard = Arc::new(AuthGuard::new(
            session,
            auth.clone(),
            events.clone(),
            notifier.clone(),
            navigator.clone(),
        ));
        Fixture {
            auth,
            repository,
            notifier,
            navigator,
            events,
            guard,
        }
    }

    #[tokio::test]
    async fn test_initialize_restores_session_with_token_and_identity() {
        let f = fixture();
        f.auth.set_credentials("tok", student());
        f.guard.initialize().await;

        assert_eq!(f.guard.state(), GuardState::Ready);
        assert!(f.guard.session.is_authenticated().await);
        assert_eq!(f.guard.session.current_user().await.unwrap().id, "1");
        assert_eq!(f.navigator.login_navigations(), 0);
    }

    #[tokio::test]
    async fn test_initialize_without_token_forces_anonymous() {
        let f = fixture_with(
            MockAuthService::default(),
            MemorySessionRepository::with_record(SessionSnapshot {
                user: Some(student()),
                is_authenticated: true,
            }),
        );
        f.guard.session.hydrate().await;
        assert!(f.guard.session.is_authenticated().await);

        f.guard.initialize().await;
        assert!(!f.guard.session.is_authenticated().await);
        assert!(f.guard.session.current_user().await.is_none());
        // Quiet cleanup at startup, no expiry banner and no redirect.
        assert_eq!(f.notifier.count(), 0);
        assert_eq!(f.navigator.login_navigations(), 0);
    }

    #[tokio::test]
    async fn test_initialize_fails_closed_on_token_without_identity() {
        let f = fixture_with(
            MockAuthService::default(),
            MemorySessionRepository::with_record(SessionSnapshot {
                user: Some(student()),
                is_authenticated: true,
            }),
        );
        f.auth.set_orphan_token();
        f.guard.session.hydrate().await;

        f.guard.initialize().await;

        assert_eq!(f.guard.state(), GuardState::Ready);
        assert!(!f.guard.session.is_authenticated().await);
        assert!(f.guard.session.current_user().await.is_none());
        assert!(!f.auth.is_authenticated());
        assert_eq!(f.navigator.login_navigations(), 1);
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let f = fixture();
        f.guard.initialize().await;
        assert_eq!(f.guard.state(), GuardState::Ready);
        let saves = f.repository.save_calls.load(std::sync::atomic::Ordering::SeqCst);

        f.guard.initialize().await;
        assert_eq!(
            f.repository.save_calls.load(std::sync::atomic::Ordering::SeqCst),
            saves
        );
    }

    #[tokio::test]
    async fn test_wait_ready_observes_late_and_early_subscribers() {
        let f = fixture();
        assert_eq!(f.guard.state(), GuardState::Uninitialized);

        let early = {
            let guard = f.guard.clone();
            tokio::spawn(async move { guard.wait_ready().await })
        };
        f.guard.initialize().await;
        early.await.unwrap();

        // Late subscriber returns immediately.
        f.guard.wait_ready().await;
        assert_eq!(f.guard.state(), GuardState::Ready);
    }

    #[tokio::test]
    async fn test_unauthorized_logs_out_notifies_and_redirects() {
        let f = fixture();
        f.auth.set_credentials("tok", student());
        f.guard.initialize().await;
        assert!(f.guard.session.is_authenticated().await);

        f.guard.handle_unauthorized().await;

        assert!(!f.guard.session.is_authenticated().await);
        assert!(!f.auth.is_authenticated());
        assert_eq!(f.navigator.login_navigations(), 1);
        let note = f.notifier.last().unwrap();
        assert_eq!(note.level, NotificationLevel::Info);
        assert_eq!(note.message, SESSION_EXPIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_watcher_reacts_to_emitted_unauthorized() {
        let f = fixture();
        f.auth.set_credentials("tok", student());
        f.guard.initialize().await;
        let handle = f.guard.spawn_unauthorized_watcher();

        f.events.emit_unauthorized();

        tokio::time::timeout(Duration::from_secs(1), async {
            while f.navigator.login_navigations() == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("watcher never handled the unauthorized event");

        assert!(!f.guard.session.is_authenticated().await);
        f.guard.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_stops_watcher() {
        let f = fixture();
        let handle = f.guard.spawn_unauthorized_watcher();
        f.guard.shutdown();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("watcher did not stop on shutdown")
            .unwrap();
    }
}
