pub mod coordinator;
pub mod domain;
pub mod error;
pub mod guard;
pub mod listener;
pub mod matcher;
pub mod ports;
pub mod state_machine;

pub use coordinator::{CoordinatorOptions, ImportCoordinator};
pub use domain::{
    Account, AttemptStatus, ImportAccount, ImportOutcome, Session, MAINNET_NAMESPACE,
};
pub use error::ImportError;
pub use guard::ImportIdempotencyGuard;
pub use listener::OneShotSessionListener;
pub use matcher::{first_account, match_account};
pub use ports::{
    DiagnosticsPort, PortError, RegistrarPort, RouterPort, SessionEventSource,
    SessionSubscription,
};
pub use state_machine::{attempt_transition, AttemptAction, StateTransition};
