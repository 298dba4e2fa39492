use thiserror::Error;

use crate::domain::AttemptStatus;
use crate::ports::PortError;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no matching accounts found in namespace {namespace} for session {topic}")]
    NoMatchingAccount { topic: String, namespace: String },
    #[error("registration failed: {0}")]
    RegistrationFailed(#[source] PortError),
    #[error("persisting imported account failed: {0}")]
    PersistenceFailed(#[source] PortError),
    #[error("illegal attempt transition for {topic}: {from:?} -> {to:?}")]
    InvalidTransition {
        topic: String,
        from: Option<AttemptStatus>,
        to: AttemptStatus,
    },
    #[error("session event source closed")]
    SessionSourceClosed,
    #[error("import cancelled")]
    Cancelled,
    #[error("no tokio runtime available to run the background session subscription")]
    RuntimeUnavailable,
}
