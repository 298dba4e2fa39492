//! Import screen state: the typed-account field, the alert slot, and the three button verbs.

use chat_import_core::{
    DiagnosticsPort, ImportCoordinator, ImportError, ImportOutcome, RegistrarPort, RouterPort,
    SessionEventSource,
};

pub const SCENE_TITLE: &str = "Import account";

pub struct ImportPresenter<E, R, N, D>
where
    E: SessionEventSource,
    R: RegistrarPort + 'static,
    N: RouterPort + 'static,
    D: DiagnosticsPort + 'static,
{
    coordinator: ImportCoordinator<E, R, N, D>,
    pub input: String,
    alert: Option<String>,
}

impl<E, R, N, D> ImportPresenter<E, R, N, D>
where
    E: SessionEventSource,
    R: RegistrarPort + 'static,
    N: RouterPort + 'static,
    D: DiagnosticsPort + 'static,
{
    pub fn new(coordinator: ImportCoordinator<E, R, N, D>) -> Self {
        Self {
            coordinator,
            input: String::new(),
            alert: None,
        }
    }

    pub fn scene_title(&self) -> &'static str {
        SCENE_TITLE
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub async fn did_press_web3_modal(&mut self) -> Result<ImportOutcome, ImportError> {
        let result = self.coordinator.await_external_session_and_import().await;
        self.surface(result)
    }

    pub async fn did_press_import(&mut self) -> Result<ImportOutcome, ImportError> {
        let result = self.coordinator.import_typed_input(&self.input).await;
        if matches!(result, Ok(ImportOutcome::InputReset)) {
            self.input.clear();
        }
        self.surface(result)
    }

    pub async fn did_press_random(&mut self) -> Result<ImportOutcome, ImportError> {
        let result = self.coordinator.import_random().await;
        self.surface(result)
    }

    /// Called when the screen goes away.
    pub fn teardown(&self) {
        self.coordinator.teardown();
    }

    fn surface(
        &mut self,
        result: Result<ImportOutcome, ImportError>,
    ) -> Result<ImportOutcome, ImportError> {
        if let Err(err) = &result {
            self.alert = alert_message(err);
        }
        result
    }
}

fn alert_message(err: &ImportError) -> Option<String> {
    match err {
        ImportError::Cancelled => None,
        ImportError::NoMatchingAccount { .. } => {
            Some("No matching accounts found in namespaces".to_owned())
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chat_import_adapters::{
        CallJournal, InMemoryRegistrar, RecordingRouter, TracingDiagnostics,
        WalletConnectSessionSource,
    };
    use chat_import_core::{Account, CoordinatorOptions, ImportAccount, Session};

    use super::*;

    type TestPresenter = ImportPresenter<
        WalletConnectSessionSource,
        InMemoryRegistrar,
        RecordingRouter,
        TracingDiagnostics,
    >;

    fn presenter() -> (
        TestPresenter,
        WalletConnectSessionSource,
        RecordingRouter,
        InMemoryRegistrar,
    ) {
        let journal = CallJournal::default();
        let source = WalletConnectSessionSource::default();
        let registrar = InMemoryRegistrar::with_journal(journal.clone());
        let router = RecordingRouter::with_journal(journal);
        let coordinator = ImportCoordinator::new(
            source.clone(),
            registrar.clone(),
            router.clone(),
            TracingDiagnostics::default(),
            CoordinatorOptions::default(),
        )
        .expect("coordinator inside runtime");
        (ImportPresenter::new(coordinator), source, router, registrar)
    }

    #[tokio::test]
    async fn invalid_input_clears_field_without_alert() {
        let (mut presenter, _, router, _) = presenter();
        presenter.input = "nonsense".to_owned();

        let outcome = presenter.did_press_import().await.expect("no error");

        assert_eq!(outcome, ImportOutcome::InputReset);
        assert!(presenter.input.is_empty());
        assert!(presenter.alert().is_none());
        assert!(router.journal().entries().is_empty());
    }

    #[tokio::test]
    async fn valid_input_is_imported_and_kept() {
        let (mut presenter, _, router, _) = presenter();
        presenter.input = "0x000000000000000000000000000000000000beef".to_owned();

        let outcome = presenter.did_press_import().await.expect("import");

        assert!(matches!(
            outcome,
            ImportOutcome::Imported(ImportAccount::ManualInput(_))
        ));
        assert!(!presenter.input.is_empty());
        assert_eq!(router.journal().count_prefix("present_chat:"), 1);
    }

    #[tokio::test]
    async fn registration_failure_raises_alert() {
        let (mut presenter, _, router, registrar) = presenter();
        registrar
            .debug_inject_register_failure("relay offline")
            .expect("inject failure");

        presenter.did_press_random().await.expect_err("register fails");

        assert!(presenter.alert().is_some_and(|a| a.contains("relay offline")));
        assert_eq!(router.journal().count_prefix("present_chat:"), 0);
        presenter.dismiss_alert();
        assert!(presenter.alert().is_none());
    }

    #[tokio::test]
    async fn web3_modal_session_without_mainnet_account_alerts() {
        let (mut presenter, source, router, registrar) = presenter();

        // Park the background subscription on another import so the modal sees the session first.
        registrar.debug_hold_registrations();
        source.settle(Session {
            topic: "t-busy".to_owned(),
            accounts: vec![Account::new("eip155:1", "0xB05E")],
        });
        while router.journal().count_prefix("register:") == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let (result, _) = tokio::join!(presenter.did_press_web3_modal(), async {
            router.pairing_presented().await;
            source.settle(Session {
                topic: "t-alert".to_owned(),
                accounts: vec![Account::new("eip155:137", "0xCCC")],
            });
        });
        registrar.debug_release_registrations();

        assert!(matches!(result, Err(ImportError::NoMatchingAccount { .. })));
        assert_eq!(
            presenter.alert(),
            Some("No matching accounts found in namespaces")
        );
    }

    #[tokio::test]
    async fn cancelled_wait_raises_no_alert() {
        let (mut presenter, _, _, _) = presenter();
        presenter.teardown();

        let result = presenter.did_press_web3_modal().await;

        assert!(matches!(result, Err(ImportError::Cancelled)));
        assert!(presenter.alert().is_none());
    }

    #[tokio::test]
    async fn scene_title_is_fixed() {
        let (presenter, _, _, _) = presenter();
        assert_eq!(presenter.scene_title(), "Import account");
    }
}
