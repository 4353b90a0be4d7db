//! Generic async request executor.
//!
//! Wraps a fallible async call with the loading/data/error bookkeeping
//! every data-fetching screen repeats. Read-style operation: failures are
//! absorbed into the error slot and one notification; nothing here ever
//! propagates to the caller. Committing operations with their own control
//! flow belong on the session store instead.

use std::sync::{Arc, Mutex};

use tokio_util::sync::CancellationToken;

use portal_core::error::{PortalError, Result};
use portal_core::notify::{Notification, NotificationSink};

/// Observable state of one executor: the last good value, the last raw
/// failure, and whether a call is in flight.
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub error: Option<PortalError>,
    pub is_loading: bool,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
        }
    }
}

/// Per-call behavior switches.
pub struct ExecuteOptions<T> {
    /// Shown on success when set; absent means silent success.
    pub success_message: Option<String>,
    /// Replaces the failure's display message in the notification only.
    /// The raw error still lands in the error slot untouched.
    pub error_message: Option<String>,
    /// Invoked with the value after the state update on success.
    pub on_success: Option<Box<dyn FnOnce(&T) + Send>>,
    /// Invoked with the raw error after the state update on failure.
    pub on_error: Option<Box<dyn FnOnce(&PortalError) + Send>>,
}

impl<T> Default for ExecuteOptions<T> {
    fn default() -> Self {
        Self {
            success_message: None,
            error_message: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> ExecuteOptions<T> {
    pub fn with_success_message(message: impl Into<String>) -> Self {
        Self {
            success_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_error_message(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Executor for read-style requests of one value type.
///
/// Cheap to clone; clones share state, so a screen can hand the executor to
/// a background task and keep reading it. Concurrent `execute` calls on one
/// instance are not coordinated; the last settle wins the final state.
pub struct RequestExecutor<T> {
    state: Arc<Mutex<RequestState<T>>>,
    notifier: Arc<dyn NotificationSink>,
    cancel: CancellationToken,
}

impl<T> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            notifier: self.notifier.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> RequestExecutor<T> {
    pub fn new(notifier: Arc<dyn NotificationSink>, cancel: CancellationToken) -> Self {
        Self {
            state: Arc::new(Mutex::new(RequestState::default())),
            notifier,
            cancel,
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> RequestState<T> {
        self.state.lock().unwrap().clone()
    }

    pub fn data(&self) -> Option<T> {
        self.state.lock().unwrap().data.clone()
    }

    pub fn error(&self) -> Option<PortalError> {
        self.state.lock().unwrap().error.clone()
    }

    /// Display text for the stored error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.state.lock().unwrap().error.as_ref().map(PortalError::display_message)
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().unwrap().is_loading
    }

    /// Runs one request with default options.
    pub async fn execute<F>(&self, request: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.execute_with(request, ExecuteOptions::default()).await
    }

    /// Runs one request.
    ///
    /// While the call is in flight the loading flag is set and the error
    /// slot is cleared; prior data stays visible so screens can render the
    /// stale value under a spinner. On success the value is stored and
    /// returned; on failure the previous data is kept, the raw error lands
    /// in the error slot, one error notification fires, and `None` is
    /// returned. If the executor is cancelled while the call is in flight
    /// the outcome is discarded entirely and only the loading flag is
    /// cleared.
    pub async fn execute_with<F>(&self, request: F, options: ExecuteOptions<T>) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return None;
        }

        {
            let mut state = self.state.lock().unwrap();
            state.is_loading = true;
            state.error = None;
        }

        let outcome = tokio::select! {
            outcome = request => Some(outcome),
            _ = self.cancel.cancelled() => None,
        };

        let Some(outcome) = outcome else {
            self.state.lock().unwrap().is_loading = false;
            tracing::debug!("request cancelled mid-flight, outcome discarded");
            return None;
        };

        match outcome {
            Ok(value) => {
                {
                    let mut state = self.state.lock().unwrap();
                    state.data = Some(value.clone());
                    state.error = None;
                    state.is_loading = false;
                }
                if let Some(message) = options.success_message {
                    self.notifier.notify(Notification::success(message));
                }
                if let Some(on_success) = options.on_success {
                    on_success(&value);
                }
                Some(value)
            }
            Err(e) => {
                let message = options
                    .error_message
                    .unwrap_or_else(|| e.display_message());
                {
                    let mut state = self.state.lock().unwrap();
                    state.error = Some(e.clone());
                    state.is_loading = false;
                }
                self.notifier.notify(Notification::error(message));
                if let Some(on_error) = options.on_error {
                    on_error(&e);
                }
                None
            }
        }
    }

    /// Clears data, error and loading back to the initial state.
    pub fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        *state = RequestState::default();
    }

    /// Writes a value into the data slot without running a request. Used
    /// for optimistic updates and cache priming.
    pub fn set_data(&self, value: T) {
        self.state.lock().unwrap().data = Some(value);
    }
}
