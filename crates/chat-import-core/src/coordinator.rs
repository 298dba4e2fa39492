use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{
    Account, AttemptStatus, ImportAccount, ImportOutcome, Session, MAINNET_NAMESPACE,
};
use crate::error::ImportError;
use crate::guard::ImportIdempotencyGuard;
use crate::listener::OneShotSessionListener;
use crate::matcher::{first_account, match_account};
use crate::ports::{
    DiagnosticsPort, RegistrarPort, RouterPort, SessionEventSource, SessionSubscription,
};

#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Namespace the explicit pairing wait requires of the settled session.
    pub required_namespace: String,
    /// Namespace used for generated random accounts.
    pub random_account_namespace: String,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            required_namespace: MAINNET_NAMESPACE.to_owned(),
            random_account_namespace: MAINNET_NAMESPACE.to_owned(),
        }
    }
}

/// Imports chat accounts from settled wallet sessions, typed input, or random generation.
///
/// On construction the coordinator subscribes to `source` for its whole lifetime. Sessions
/// seen there and sessions observed by [`Self::await_external_session_and_import`] pass the
/// same idempotency guard, so the register/save/present sequence runs at most once per topic.
pub struct ImportCoordinator<E, R, N, D>
where
    E: SessionEventSource,
    R: RegistrarPort + 'static,
    N: RouterPort + 'static,
    D: DiagnosticsPort + 'static,
{
    source: E,
    shared: Arc<Shared<R, N, D>>,
    shutdown: watch::Sender<bool>,
    background: Mutex<Option<JoinHandle<()>>>,
}

struct Shared<R, N, D> {
    registrar: R,
    router: N,
    diagnostics: D,
    guard: ImportIdempotencyGuard,
    options: CoordinatorOptions,
}

impl<E, R, N, D> ImportCoordinator<E, R, N, D>
where
    E: SessionEventSource,
    R: RegistrarPort + 'static,
    N: RouterPort + 'static,
    D: DiagnosticsPort + 'static,
{
    /// Starts the background subscription on the current tokio runtime.
    pub fn new(
        source: E,
        registrar: R,
        router: N,
        diagnostics: D,
        options: CoordinatorOptions,
    ) -> Result<Self, ImportError> {
        let runtime = Handle::try_current().map_err(|_| ImportError::RuntimeUnavailable)?;
        Ok(Self::with_runtime(
            &runtime,
            source,
            registrar,
            router,
            diagnostics,
            options,
        ))
    }

    /// Starts the background subscription on `runtime`.
    pub fn with_runtime(
        runtime: &Handle,
        source: E,
        registrar: R,
        router: N,
        diagnostics: D,
        options: CoordinatorOptions,
    ) -> Self {
        let shared = Arc::new(Shared {
            registrar,
            router,
            diagnostics,
            guard: ImportIdempotencyGuard::new(),
            options,
        });
        let (shutdown, _) = watch::channel(false);
        let background =
            watch_background_sessions(runtime, Arc::clone(&shared), source.subscribe());
        Self {
            source,
            shared,
            shutdown,
            background: Mutex::new(Some(background)),
        }
    }

    pub fn registrar(&self) -> &R {
        &self.shared.registrar
    }

    pub fn router(&self) -> &N {
        &self.shared.router
    }

    pub fn attempt_status(&self, topic: &str) -> Option<AttemptStatus> {
        self.shared.guard.status(topic)
    }

    pub fn is_watching(&self) -> bool {
        self.background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Shows the pairing UI and imports the account of the next settled session.
    ///
    /// Stays pending until a session settles; there is no timeout. If another listener already
    /// claimed the topic, resolves with [`ImportOutcome::AlreadyHandled`] without importing.
    /// Resolves with [`ImportError::Cancelled`] once the coordinator is torn down.
    pub async fn await_external_session_and_import(&self) -> Result<ImportOutcome, ImportError> {
        let mut shutdown = self.shutdown.subscribe();
        let stopped = *shutdown.borrow_and_update();
        if stopped {
            return Err(ImportError::Cancelled);
        }

        // Subscribe before showing the pairing UI so a fast settlement is not missed.
        let mut listener = OneShotSessionListener::subscribe(&self.source);
        self.shared.router.present_pairing_ui();

        let session = tokio::select! {
            session = listener.next() => session?,
            _ = wait_for_shutdown(&mut shutdown) => return Err(ImportError::Cancelled),
        };

        if !self.shared.guard.claim(&session.topic) {
            debug!(topic = %session.topic, "settled session already handled");
            return Ok(ImportOutcome::AlreadyHandled {
                topic: session.topic,
            });
        }
        let selected = match_account(&session, &self.shared.options.required_namespace).cloned();
        self.shared.import_claimed(&session.topic, selected).await
    }

    /// Imports the account typed by the user. Unparsable input yields
    /// [`ImportOutcome::InputReset`]. Not deduplicated.
    pub async fn import_typed_input(&self, text: &str) -> Result<ImportOutcome, ImportError> {
        let Some(account) = ImportAccount::from_input(text) else {
            debug!("typed account input rejected");
            return Ok(ImportOutcome::InputReset);
        };
        self.shared.run_import(account).await
    }

    pub async fn import_random(&self) -> Result<ImportOutcome, ImportError> {
        let account = ImportAccount::generate(&self.shared.options.random_account_namespace);
        self.shared.run_import(account).await
    }

    /// Stops the background subscription and cancels any outstanding pairing wait.
    pub fn teardown(&self) {
        self.shutdown.send_replace(true);
        let handle = self
            .background
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            debug!("background session subscription stopped");
        }
    }
}

impl<E, R, N, D> Drop for ImportCoordinator<E, R, N, D>
where
    E: SessionEventSource,
    R: RegistrarPort + 'static,
    N: RouterPort + 'static,
    D: DiagnosticsPort + 'static,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<R, N, D> Shared<R, N, D>
where
    R: RegistrarPort,
    N: RouterPort,
    D: DiagnosticsPort,
{
    async fn on_background_session(&self, session: Session) {
        if !self.guard.claim(&session.topic) {
            debug!(topic = %session.topic, "settled session already handled");
            return;
        }
        // No namespace filter on this path: the first account is taken whatever its chain.
        let selected = first_account(&session).cloned();
        if let Err(err) = self.import_claimed(&session.topic, selected).await {
            self.diagnostics.report(&session.topic, &err);
        }
    }

    async fn import_claimed(
        &self,
        topic: &str,
        selected: Result<Account, ImportError>,
    ) -> Result<ImportOutcome, ImportError> {
        let attempt = PendingAttempt::new(&self.guard, topic);
        let result = match selected {
            Ok(account) => self.run_import(ImportAccount::from_session(account, topic)).await,
            Err(err) => Err(err),
        };
        attempt.finish(&result)?;
        result
    }

    async fn run_import(&self, account: ImportAccount) -> Result<ImportOutcome, ImportError> {
        self.registrar
            .register(&account)
            .await
            .map_err(ImportError::RegistrationFailed)?;
        self.registrar
            .save(&account)
            .await
            .map_err(ImportError::PersistenceFailed)?;
        self.router.present_chat(&account);
        info!(account = %account.account(), "account imported");
        Ok(ImportOutcome::Imported(account))
    }
}

/// A claimed topic whose import sequence is running. If the sequence is dropped before it
/// finishes (caller gave up on the wait, or teardown aborted the background task), the attempt
/// is recorded as failed so it still reaches a terminal state.
struct PendingAttempt<'a> {
    guard: &'a ImportIdempotencyGuard,
    topic: &'a str,
    finished: bool,
}

impl<'a> PendingAttempt<'a> {
    fn new(guard: &'a ImportIdempotencyGuard, topic: &'a str) -> Self {
        Self {
            guard,
            topic,
            finished: false,
        }
    }

    fn finish(mut self, result: &Result<ImportOutcome, ImportError>) -> Result<(), ImportError> {
        self.finished = true;
        let transition = match result {
            Ok(_) => self.guard.complete(self.topic)?,
            Err(_) => self.guard.fail(self.topic)?,
        };
        debug!(topic = self.topic, reason = transition.reason, "import attempt finished");
        Ok(())
    }
}

impl Drop for PendingAttempt<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        warn!(topic = self.topic, "import attempt interrupted");
        if let Err(err) = self.guard.fail(self.topic) {
            warn!(topic = self.topic, error = %err, "could not record interrupted attempt");
        }
    }
}

fn watch_background_sessions<R, N, D>(
    runtime: &Handle,
    shared: Arc<Shared<R, N, D>>,
    mut subscription: SessionSubscription,
) -> JoinHandle<()>
where
    R: RegistrarPort + 'static,
    N: RouterPort + 'static,
    D: DiagnosticsPort + 'static,
{
    runtime.spawn(async move {
        loop {
            match subscription.recv().await {
                Ok(session) => shared.on_background_session(session).await,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "background session subscription lagged");
                }
                Err(RecvError::Closed) => {
                    debug!("session source closed; background subscription finished");
                    break;
                }
            }
        }
    })
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        let stopped = *shutdown.borrow_and_update();
        if stopped || shutdown.changed().await.is_err() {
            return;
        }
    }
}
