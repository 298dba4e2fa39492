use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::domain::AttemptStatus;
use crate::error::ImportError;
use crate::state_machine::{attempt_transition, AttemptAction, StateTransition};

/// Records which session topics have triggered an import, and how each attempt ended.
///
/// `claim` is the only serialization point between the background subscription and the
/// explicit pairing wait: the check and the insert happen under one lock, so two callers can
/// never both observe a topic as unclaimed. Claims are never released.
#[derive(Debug, Default)]
pub struct ImportIdempotencyGuard {
    attempts: Mutex<HashMap<String, AttemptStatus>>,
}

impl ImportIdempotencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once per topic; the attempt is then `Pending`.
    pub fn claim(&self, topic: &str) -> bool {
        let mut attempts = self.lock();
        if attempts.contains_key(topic) {
            debug!(topic, "session topic already claimed");
            return false;
        }
        attempts.insert(topic.to_owned(), AttemptStatus::Pending);
        debug!(topic, "session topic claimed");
        true
    }

    pub fn complete(&self, topic: &str) -> Result<StateTransition, ImportError> {
        self.advance(topic, AttemptAction::Complete)
    }

    pub fn fail(&self, topic: &str) -> Result<StateTransition, ImportError> {
        self.advance(topic, AttemptAction::Fail)
    }

    pub fn status(&self, topic: &str) -> Option<AttemptStatus> {
        self.lock().get(topic).copied()
    }

    pub fn is_claimed(&self, topic: &str) -> bool {
        self.lock().contains_key(topic)
    }

    fn advance(&self, topic: &str, action: AttemptAction) -> Result<StateTransition, ImportError> {
        let mut attempts = self.lock();
        let from = attempts.get(topic).copied();
        let (to, transition) = attempt_transition(topic, from, action)?;
        attempts.insert(topic.to_owned(), to);
        Ok(transition)
    }

    // Every mutation is a single insert, so the map is consistent even after a panic elsewhere.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, AttemptStatus>> {
        self.attempts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
