//! Logging-backed notification sink.
//!
//! The default sink for headless and test runs: notifications become
//! structured log lines. A real front end swaps in a toast-backed sink.

use portal_core::notify::{Notification, NotificationLevel, NotificationSink};

/// Notification sink that forwards every notification to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(kind = "success", "{}", notification.message)
            }
            NotificationLevel::Error => tracing::warn!(kind = "error", "{}", notification.message),
            NotificationLevel::Info => tracing::info!(kind = "info", "{}", notification.message),
        }
    }
}
