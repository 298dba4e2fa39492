use std::sync::{Arc, Mutex, PoisonError};

use tracing::error;

use chat_import_core::{DiagnosticsPort, ImportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub topic: String,
    pub message: String,
}

/// Logs background import failures and keeps them for inspection.
#[derive(Debug, Clone, Default)]
pub struct TracingDiagnostics {
    reports: Arc<Mutex<Vec<DiagnosticReport>>>,
}

impl TracingDiagnostics {
    pub fn reports(&self) -> Vec<DiagnosticReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticsPort for TracingDiagnostics {
    fn report(&self, topic: &str, err: &ImportError) {
        error!(topic, error = %err, "background account import failed");
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DiagnosticReport {
                topic: topic.to_owned(),
                message: err.to_string(),
            });
    }
}
