#![allow(dead_code)]

use std::time::Duration;

use chat_import_adapters::{
    CallJournal, ImportAdapterConfig, InMemoryRegistrar, RecordingRouter, TracingDiagnostics,
    WalletConnectSessionSource,
};
use chat_import_core::{Account, ImportCoordinator, Session};

pub type TestCoordinator = ImportCoordinator<
    WalletConnectSessionSource,
    InMemoryRegistrar,
    RecordingRouter,
    TracingDiagnostics,
>;

pub struct Harness {
    pub coordinator: TestCoordinator,
    pub source: WalletConnectSessionSource,
    pub registrar: InMemoryRegistrar,
    pub router: RecordingRouter,
    pub diagnostics: TracingDiagnostics,
    pub journal: CallJournal,
}

pub fn new_harness() -> Harness {
    let journal = CallJournal::default();
    let source = WalletConnectSessionSource::default();
    let registrar = InMemoryRegistrar::with_journal(journal.clone());
    let router = RecordingRouter::with_journal(journal.clone());
    let diagnostics = TracingDiagnostics::default();
    let coordinator = ImportCoordinator::new(
        source.clone(),
        registrar.clone(),
        router.clone(),
        diagnostics.clone(),
        ImportAdapterConfig::default().coordinator_options(),
    )
    .expect("coordinator inside runtime");
    Harness {
        coordinator,
        source,
        registrar,
        router,
        diagnostics,
        journal,
    }
}

pub fn session(topic: &str, accounts: &[(&str, &str)]) -> Session {
    Session {
        topic: topic.to_owned(),
        accounts: accounts
            .iter()
            .map(|(namespace, address)| Account::new(*namespace, *address))
            .collect(),
    }
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

pub async fn wait_for_terminal(h: &Harness, topic: &str) {
    wait_until(|| {
        h.coordinator
            .attempt_status(topic)
            .is_some_and(|status| status.is_terminal())
    })
    .await;
}

/// Parks the background subscription inside a registration so the next settled session
/// reaches the explicit pairing wait first. Release with `debug_release_registrations`.
pub async fn occupy_background(h: &Harness) {
    h.registrar.debug_hold_registrations();
    h.source
        .settle(session("busy-topic", &[("eip155:1", "0xB05E")]));
    wait_until(|| h.journal.count_prefix("register:eip155:1:0xB05E") == 1).await;
}
