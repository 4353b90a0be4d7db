//! Logging-backed navigator.

use portal_core::nav::Navigator;

/// Navigator that records navigation intents as log lines. The default for
/// headless runs; a real front end swaps in its router.
#[derive(Debug, Clone, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn to_login(&self) {
        tracing::info!(target: "navigation", "navigating to login");
    }
}
