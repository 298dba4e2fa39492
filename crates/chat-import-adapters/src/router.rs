use std::sync::Arc;

use tokio::sync::Notify;
use tracing::info;

use chat_import_core::{ImportAccount, RouterPort};

use crate::journal::CallJournal;

/// Router that logs and records navigation instead of presenting screens.
#[derive(Debug, Clone, Default)]
pub struct RecordingRouter {
    journal: CallJournal,
    pairing_presented: Arc<Notify>,
}

impl RecordingRouter {
    pub fn with_journal(journal: CallJournal) -> Self {
        Self {
            journal,
            pairing_presented: Arc::default(),
        }
    }

    pub fn journal(&self) -> &CallJournal {
        &self.journal
    }

    /// Resolves once the pairing UI has been presented (consumes one presentation).
    pub async fn pairing_presented(&self) {
        self.pairing_presented.notified().await;
    }
}

impl RouterPort for RecordingRouter {
    fn present_chat(&self, account: &ImportAccount) {
        info!(account = %account.account(), "presenting chat");
        self.journal.record(format!("present_chat:{}", account.account()));
    }

    fn present_pairing_ui(&self) {
        info!("presenting pairing modal");
        self.journal.record("present_pairing_ui");
        self.pairing_presented.notify_one();
    }
}
