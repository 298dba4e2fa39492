use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use chat_import_core::{ImportAccount, PortError, RegistrarPort};

use crate::journal::CallJournal;

/// Registrar backed by an in-memory account store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistrar {
    inner: Arc<Mutex<RegistrarState>>,
    gate: Arc<RegisterGate>,
    journal: CallJournal,
}

#[derive(Debug, Default)]
struct RegisterGate {
    held: AtomicBool,
    released: Notify,
}

#[derive(Debug, Default)]
struct RegistrarState {
    registered: Vec<ImportAccount>,
    saved: Vec<ImportAccount>,
    register_failure: Option<String>,
    save_failure: Option<String>,
}

impl InMemoryRegistrar {
    pub fn with_journal(journal: CallJournal) -> Self {
        Self {
            inner: Arc::default(),
            gate: Arc::default(),
            journal,
        }
    }

    pub fn journal(&self) -> &CallJournal {
        &self.journal
    }

    /// Every following `register` call is rejected with `reason`.
    pub fn debug_inject_register_failure(
        &self,
        reason: impl Into<String>,
    ) -> Result<(), PortError> {
        self.state()?.register_failure = Some(reason.into());
        Ok(())
    }

    /// Every following `save` call fails with `reason`.
    pub fn debug_inject_save_failure(&self, reason: impl Into<String>) -> Result<(), PortError> {
        self.state()?.save_failure = Some(reason.into());
        Ok(())
    }

    /// Parks `register` calls (after they are journaled) until released.
    pub fn debug_hold_registrations(&self) {
        self.gate.held.store(true, Ordering::SeqCst);
    }

    pub fn debug_release_registrations(&self) {
        self.gate.held.store(false, Ordering::SeqCst);
        self.gate.released.notify_waiters();
    }

    pub fn registered(&self) -> Result<Vec<ImportAccount>, PortError> {
        Ok(self.state()?.registered.clone())
    }

    pub fn saved(&self) -> Result<Vec<ImportAccount>, PortError> {
        Ok(self.state()?.saved.clone())
    }

    fn state(&self) -> Result<MutexGuard<'_, RegistrarState>, PortError> {
        self.inner
            .lock()
            .map_err(|e| PortError::Storage(format!("registrar lock poisoned: {e}")))
    }
}

#[async_trait]
impl RegistrarPort for InMemoryRegistrar {
    async fn register(&self, account: &ImportAccount) -> Result<(), PortError> {
        self.journal.record(format!("register:{}", account.account()));
        loop {
            let released = self.gate.released.notified();
            if !self.gate.held.load(Ordering::SeqCst) {
                break;
            }
            released.await;
        }
        let mut g = self.state()?;
        if let Some(reason) = g.register_failure.clone() {
            return Err(PortError::Rejected(reason));
        }
        g.registered.push(account.clone());
        Ok(())
    }

    async fn save(&self, account: &ImportAccount) -> Result<(), PortError> {
        self.journal.record(format!("save:{}", account.account()));
        let mut g = self.state()?;
        if let Some(reason) = g.save_failure.clone() {
            return Err(PortError::Storage(reason));
        }
        g.saved.push(account.clone());
        Ok(())
    }
}
