use tokio::sync::broadcast;
use tracing::debug;

use chat_import_core::{PortError, Session, SessionEventSource, SessionSubscription};

/// In-process stand-in for the wallet-connection client's "session settled" publisher.
#[derive(Debug, Clone)]
pub struct WalletConnectSessionSource {
    sender: broadcast::Sender<Session>,
}

impl Default for WalletConnectSessionSource {
    fn default() -> Self {
        Self::new(16)
    }
}

impl WalletConnectSessionSource {
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcasts a settled session. Returns how many subscribers received it.
    pub fn settle(&self, session: Session) -> usize {
        let topic = session.topic.clone();
        let delivered = self.sender.send(session).unwrap_or(0);
        debug!(topic = %topic, delivered, "session settled");
        delivered
    }

    /// Decodes a settled-session payload from the protocol client and broadcasts it.
    pub fn settle_json(&self, payload: &str) -> Result<usize, PortError> {
        let session: Session = serde_json::from_str(payload)
            .map_err(|e| PortError::Validation(format!("invalid session payload: {e}")))?;
        Ok(self.settle(session))
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SessionEventSource for WalletConnectSessionSource {
    fn subscribe(&self) -> SessionSubscription {
        self.sender.subscribe()
    }
}
