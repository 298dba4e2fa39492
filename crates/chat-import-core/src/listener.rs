use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use crate::domain::Session;
use crate::error::ImportError;
use crate::ports::{SessionEventSource, SessionSubscription};

/// Waits for exactly one settled session, then unsubscribes.
///
/// The subscription is dropped as soon as the first session arrives, on `dispose`, or when the
/// listener itself is dropped.
#[derive(Debug)]
pub struct OneShotSessionListener {
    subscription: Option<SessionSubscription>,
}

impl OneShotSessionListener {
    pub fn subscribe<E: SessionEventSource + ?Sized>(source: &E) -> Self {
        Self {
            subscription: Some(source.subscribe()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Resolves with the next settled session. Stays pending for as long as none arrives.
    pub async fn next(&mut self) -> Result<Session, ImportError> {
        let subscription = self
            .subscription
            .as_mut()
            .ok_or(ImportError::Cancelled)?;
        let result = loop {
            match subscription.recv().await {
                Ok(session) => break Ok(session),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "one-shot session listener lagged");
                }
                Err(RecvError::Closed) => break Err(ImportError::SessionSourceClosed),
            }
        };
        self.dispose();
        result
    }

    pub fn dispose(&mut self) {
        self.subscription = None;
    }
}
