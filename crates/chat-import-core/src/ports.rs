use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::domain::{ImportAccount, Session};
use crate::error::ImportError;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Receiving end of a session-settlement subscription. Dropping it unsubscribes.
pub type SessionSubscription = broadcast::Receiver<Session>;

/// Source of "session settled" notifications. Every subscriber sees every session.
pub trait SessionEventSource: Send + Sync {
    fn subscribe(&self) -> SessionSubscription;
}

#[async_trait]
pub trait RegistrarPort: Send + Sync {
    async fn register(&self, account: &ImportAccount) -> Result<(), PortError>;
    async fn save(&self, account: &ImportAccount) -> Result<(), PortError>;
}

pub trait RouterPort: Send + Sync {
    fn present_chat(&self, account: &ImportAccount);
    fn present_pairing_ui(&self);
}

/// Out-of-band sink for failures on paths that have no caller to report to.
pub trait DiagnosticsPort: Send + Sync {
    fn report(&self, topic: &str, error: &ImportError);
}
