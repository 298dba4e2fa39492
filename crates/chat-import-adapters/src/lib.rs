pub mod config;
pub mod diagnostics;
pub mod journal;
pub mod registrar;
pub mod router;
pub mod wc;

pub use config::ImportAdapterConfig;
pub use diagnostics::{DiagnosticReport, TracingDiagnostics};
pub use journal::CallJournal;
pub use registrar::InMemoryRegistrar;
pub use router::RecordingRouter;
pub use wc::WalletConnectSessionSource;
