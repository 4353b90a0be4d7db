//! Process-wide authentication events.
//!
//! The transport layer emits [`AuthEvent::Unauthorized`] whenever a request
//! comes back authorization-denied; the auth guard is the only component
//! that acts on it. A broadcast channel is used so that the emitter never
//! blocks and late subscribers (tests, future listeners) attach freely.

use tokio::sync::broadcast;

/// Events broadcast on the `auth:unauthorized` channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server declared the current credentials invalid.
    Unauthorized,
}

/// Cloneable handle to the process-wide auth event channel.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    /// Creates a new channel. One instance is created at application start
    /// and cloned into every emitter and subscriber.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(16);
        Self { sender }
    }

    /// Subscribes to the channel. Events emitted before this call are not
    /// replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    /// Emits the unauthorized signal. A send with no live subscribers is
    /// not an error; the signal is simply dropped.
    pub fn emit_unauthorized(&self) {
        if self.sender.send(AuthEvent::Unauthorized).is_err() {
            tracing::debug!("unauthorized event emitted with no subscribers");
        }
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_unauthorized() {
        let events = AuthEvents::new();
        let mut rx = events.subscribe();
        events.emit_unauthorized();
        assert_eq!(rx.recv().await.unwrap(), AuthEvent::Unauthorized);
    }

    #[test]
    fn test_emit_without_subscribers_is_a_no_op() {
        let events = AuthEvents::new();
        events.emit_unauthorized();
    }

    #[tokio::test]
    async fn test_clones_share_the_channel() {
        let events = AuthEvents::new();
        let emitter = events.clone();
        let mut rx = events.subscribe();
        emitter.emit_unauthorized();
        assert_eq!(rx.recv().await.unwrap(), AuthEvent::Unauthorized);
    }
}
