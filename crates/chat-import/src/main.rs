//! chat-import: headless driver for the account import screen.
//!
//! Wires the in-process adapters, then presses each import button once: the wallet modal
//! (answered by a simulated settled session), the typed-account import, and random import.

use chat_import_adapters::{
    CallJournal, ImportAdapterConfig, InMemoryRegistrar, RecordingRouter, TracingDiagnostics,
    WalletConnectSessionSource,
};
use chat_import_core::{ImportCoordinator, ImportOutcome};

mod presenter;

use presenter::ImportPresenter;

const DEMO_SESSION: &str = r#"{
    "topic": "demo-topic",
    "accounts": [
        {"namespace": "eip155:1", "address": "0x1000000000000000000000000000000000000001"},
        {"namespace": "eip155:137", "address": "0x2000000000000000000000000000000000000002"}
    ]
}"#;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting chat-import");

    let config = ImportAdapterConfig::from_env();
    let journal = CallJournal::default();
    let source = WalletConnectSessionSource::new(config.session_channel_capacity);
    let router = RecordingRouter::with_journal(journal.clone());
    let coordinator = ImportCoordinator::new(
        source.clone(),
        InMemoryRegistrar::with_journal(journal.clone()),
        router.clone(),
        TracingDiagnostics::default(),
        config.coordinator_options(),
    )?;
    let mut presenter = ImportPresenter::new(coordinator);
    tracing::info!(title = presenter.scene_title(), "scene ready");

    let (modal, settled) = tokio::join!(presenter.did_press_web3_modal(), async {
        router.pairing_presented().await;
        source.settle_json(DEMO_SESSION)
    });
    settled?;
    report("web3 modal", modal);

    presenter.input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0x000000000000000000000000000000000000beef".to_owned());
    let typed = presenter.did_press_import().await;
    report("typed input", typed);

    let random = presenter.did_press_random().await;
    report("random", random);

    if let Some(alert) = presenter.alert() {
        tracing::warn!(alert, "import alert pending");
    }
    presenter.dismiss_alert();
    presenter.teardown();

    println!("{}", serde_json::to_string_pretty(&journal.entries())?);
    Ok(())
}

fn report(verb: &str, result: Result<ImportOutcome, chat_import_core::ImportError>) {
    match result {
        Ok(ImportOutcome::Imported(account)) => {
            tracing::info!(verb, account = %account.account(), "imported");
        }
        Ok(ImportOutcome::AlreadyHandled { topic }) => {
            tracing::info!(verb, topic = %topic, "session already imported in background");
        }
        Ok(ImportOutcome::InputReset) => tracing::info!(verb, "input reset"),
        Err(err) => tracing::error!(verb, error = %err, "import failed"),
    }
}
