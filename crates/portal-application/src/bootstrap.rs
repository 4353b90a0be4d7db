//! Composition root.
//!
//! Wires storage, configuration, the HTTP auth adapter, the session store
//! and the auth guard into one [`PortalRuntime`] that the UI shell owns for
//! the process lifetime. Everything downstream receives `Arc`ed ports; only
//! this module knows the concrete types.

use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use portal_core::error::Result;
use portal_core::events::AuthEvents;
use portal_core::nav::Navigator;
use portal_core::notify::NotificationSink;
use portal_core::repository::ThemeRepository;
use portal_core::theme::ThemeMode;
use portal_infrastructure::{
    ConfigService, FileCredentialStore, FileSessionRepository, FileThemeRepository, PortalPaths,
    TracingNavigator, TracingNotifier,
};
use portal_interaction::HttpAuthService;

use crate::executor::RequestExecutor;
use crate::guard::AuthGuard;
use crate::session_store::SessionStore;

/// The assembled client runtime.
pub struct PortalRuntime {
    session: Arc<SessionStore>,
    guard: Arc<AuthGuard>,
    theme: Arc<dyn ThemeRepository>,
    notifier: Arc<dyn NotificationSink>,
    config: ConfigService,
    cancel: CancellationToken,
    watcher: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl PortalRuntime {
    /// Boots against the standard storage location with log-backed
    /// notification and navigation sinks.
    pub async fn bootstrap() -> anyhow::Result<Self> {
        Self::bootstrap_with(
            PortalPaths::new(None),
            Arc::new(TracingNotifier),
            Arc::new(TracingNavigator),
        )
        .await
    }

    /// Boots with explicit paths and sinks. The UI shell passes its own
    /// sinks here; tests pass temp paths and recorders.
    pub async fn bootstrap_with(
        paths: PortalPaths,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> anyhow::Result<Self> {
        let config = ConfigService::new(paths.clone());
        let base_url = config.get_config().api.base_url;
        tracing::info!(%base_url, "bootstrapping portal client");

        let credentials = Arc::new(
            FileCredentialStore::new(&paths).context("resolving credential storage paths")?,
        );
        let session_repository = Arc::new(
            FileSessionRepository::new(&paths).context("resolving session storage path")?,
        );
        let theme = Arc::new(
            FileThemeRepository::new(&paths).context("resolving theme storage path")?,
        );

        let events = AuthEvents::new();
        let auth = Arc::new(HttpAuthService::new(
            base_url,
            credentials,
            events.clone(),
        ));

        let session = Arc::new(SessionStore::new(
            auth.clone(),
            session_repository,
            notifier.clone(),
        ));
        session.hydrate().await;

        let guard = Arc::new(AuthGuard::new(
            session.clone(),
            auth,
            events,
            notifier.clone(),
            navigator,
        ));
        guard.initialize().await;
        let watcher = guard.spawn_unauthorized_watcher();

        Ok(Self {
            session,
            guard,
            theme,
            notifier,
            config,
            cancel: CancellationToken::new(),
            watcher: Mutex::new(Some(watcher)),
        })
    }

    pub fn session(&self) -> Arc<SessionStore> {
        self.session.clone()
    }

    pub fn guard(&self) -> Arc<AuthGuard> {
        self.guard.clone()
    }

    pub fn config(&self) -> &ConfigService {
        &self.config
    }

    /// A fresh executor for one screen's read-style requests, cancelled
    /// together with the runtime.
    pub fn executor<T: Clone + Send + 'static>(&self) -> RequestExecutor<T> {
        RequestExecutor::new(self.notifier.clone(), self.cancel.child_token())
    }

    /// The persisted theme preference, defaulting to light.
    pub async fn theme(&self) -> ThemeMode {
        match self.theme.load().await {
            Ok(Some(mode)) => mode,
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                tracing::warn!("failed to load theme preference: {}", e);
                ThemeMode::default()
            }
        }
    }

    /// Persists the theme preference.
    pub async fn set_theme(&self, mode: ThemeMode) -> Result<()> {
        self.theme.save(mode).await
    }

    /// Stops background work. Safe to call more than once; only the first
    /// call awaits the watcher.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.guard.shutdown();
        let watcher = self.watcher.lock().unwrap().take();
        if let Some(watcher) = watcher {
            if let Err(e) = watcher.await {
                tracing::warn!("unauthorized watcher ended abnormally: {}", e);
            }
        }
        tracing::info!("portal client shut down");
    }
}
