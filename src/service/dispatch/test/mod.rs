use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serenity::{async_trait, http::Http};
use tokio::sync::{watch, Notify};

use crate::{
    data::broadcast_job::BroadcastJobRepository,
    error::{delivery::DeliveryError, AppError},
    gateway::{discord::DiscordGateway, DeliveryGateway},
    model::broadcast::{Destination, JobStatus},
    service::dispatch::{DispatchConfig, DispatchEngine},
    util::clock::{Clock, ManualClock},
};
use test_utils::{
    builder::TestBuilder, context::TestContext, factory,
    factory::broadcast_job::BroadcastJobFactory,
};


/// Gateway double whose outcome for each call is decided by a closure over
/// the zero-based call index.
struct MockGateway {
    outcome_fn: Box<dyn Fn(usize) -> Result<(), DeliveryError> + Send + Sync>,
    calls: AtomicUsize,
    sent: Mutex<Vec<String>>,
}

impl MockGateway {
    fn with_outcomes<F>(outcome_fn: F) -> Arc<Self>
    where
        F: Fn(usize) -> Result<(), DeliveryError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            outcome_fn: Box::new(outcome_fn),
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Gateway where every delivery succeeds.
    fn ok() -> Arc<Self> {
        Self::with_outcomes(|_| Ok(()))
    }

    /// Gateway where every delivery fails with a retryable error.
    fn transient_failure() -> Arc<Self> {
        Self::with_outcomes(|_| Err(DeliveryError::Transient("gateway timeout".to_string())))
    }

    /// Gateway where every delivery fails with a non-retryable error.
    fn permanent_failure() -> Arc<Self> {
        Self::with_outcomes(|_| Err(DeliveryError::Permanent("unknown channel".to_string())))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn sent_channels(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryGateway for MockGateway {
    async fn send(
        &self,
        destination: &Destination,
        _title: &str,
        _body: &str,
    ) -> Result<(), DeliveryError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = (self.outcome_fn)(call);
        if outcome.is_ok() {
            self.sent
                .lock()
                .unwrap()
                .push(destination.channel_id.clone());
        }
        outcome
    }
}

/// Gateway double whose delivery never completes, for shutdown races.
///
/// Notifies `started` when the delivery begins so a test can raise the
/// shutdown signal at exactly that point.
struct StallingGateway {
    started: Notify,
}

impl StallingGateway {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Notify::new(),
        })
    }
}

#[async_trait]
impl DeliveryGateway for StallingGateway {
    async fn send(
        &self,
        _destination: &Destination,
        _title: &str,
        _body: &str,
    ) -> Result<(), DeliveryError> {
        self.started.notify_one();
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// A dispatch engine wired to an in-memory store, a manual clock, and a
/// test-controlled shutdown signal, for driving ticks by hand.
struct EngineHarness {
    test: TestContext,
    engine: DispatchEngine,
    clock: Arc<ManualClock>,
    shutdown_tx: watch::Sender<bool>,
}

impl EngineHarness {
    fn db(&self) -> &DatabaseConnection {
        self.test.db.as_ref().unwrap()
    }

    fn repository(&self) -> BroadcastJobRepository<'_> {
        BroadcastJobRepository::new(self.db())
    }
}

/// Builds an engine over a fresh in-memory store.
///
/// Deliveries run one at a time; the in-memory database is a single shared
/// connection and must not see overlapping delivery tasks.
async fn engine_with_gateway(gateway: Arc<dyn DeliveryGateway>) -> EngineHarness {
    let test = TestBuilder::new()
        .with_broadcast_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap().clone();

    let clock = Arc::new(ManualClock::new(Utc::now()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let config = DispatchConfig {
        concurrency: 1,
        ..DispatchConfig::default()
    };

    let engine = DispatchEngine::new(db, gateway, clock.clone(), config, shutdown_rx);

    EngineHarness {
        test,
        engine,
        clock,
        shutdown_tx,
    }
}
