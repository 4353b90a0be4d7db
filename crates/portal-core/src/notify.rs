//! User-facing notification port.
//!
//! Every success or failure the user should see goes through one
//! [`NotificationSink::notify`] call; the sink decides how to present it
//! (toast, log line, test recording). The core never drops a failure
//! silently and never notifies twice for one outcome.

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A single transient, user-visible message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Port for presenting transient notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}
