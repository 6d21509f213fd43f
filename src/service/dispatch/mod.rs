//! Dispatch engine for due broadcasts.
//!
//! This module provides the `DispatchEngine` that turns pending broadcast
//! jobs into delivered messages. Each tick it requeues failed jobs whose
//! backoff has elapsed, claims due pending jobs, and delivers them through
//! the gateway with bounded concurrency.
//!
//! The engine is organized into separate modules by concern:
//! - `backoff` - Retry delay policy
//! - `tick` - The per-tick claim/deliver/record cycle

pub mod backoff;
mod tick;

#[cfg(test)]
mod test;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::sync::watch;

use crate::{
    data::broadcast_job::BroadcastJobRepository, error::AppError, gateway::DeliveryGateway,
    util::clock::Clock,
};

/// Tuning knobs for the dispatch engine.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// How often a dispatch tick runs.
    pub tick_interval: Duration,
    /// Maximum jobs claimed per tick.
    pub batch_size: u64,
    /// Delivery attempts per job before a transient failure becomes terminal.
    pub max_attempts: i32,
    /// Base retry delay; doubled per attempt.
    pub base_delay: Duration,
    /// Upper bound on the retry delay.
    pub max_delay: Duration,
    /// Maximum deliveries in flight at once.
    pub concurrency: usize,
    /// How long shutdown waits for in-flight deliveries before abandoning them.
    pub shutdown_grace: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            batch_size: 20,
            max_attempts: 3,
            base_delay: Duration::from_secs(60),
            max_delay: Duration::from_secs(3600),
            concurrency: 4,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

/// Engine that claims due broadcasts and drives their delivery.
///
/// Cheap to clone: every field is a handle. The scheduler owns one clone and
/// each in-flight delivery task another, all sharing the same shutdown signal
/// and in-flight counter.
#[derive(Clone)]
pub struct DispatchEngine {
    /// Database connection for accessing broadcast jobs via the repository
    db: DatabaseConnection,
    /// Gateway deliveries go through
    gateway: Arc<dyn DeliveryGateway>,
    /// Time source for due checks and backoff scheduling
    clock: Arc<dyn Clock>,
    /// Engine tuning
    config: DispatchConfig,
    /// Raised exactly once when the process is asked to stop
    shutdown: watch::Receiver<bool>,
    /// Number of deliveries currently in flight across all ticks
    in_flight: Arc<AtomicUsize>,
}

impl DispatchEngine {
    /// Creates a new DispatchEngine instance.
    ///
    /// # Arguments
    /// - `db` - Database connection, cloned into delivery tasks
    /// - `gateway` - Delivery gateway implementation
    /// - `clock` - Time source for scheduling decisions
    /// - `config` - Engine tuning
    /// - `shutdown` - Receiver for the process-wide shutdown signal
    ///
    /// # Returns
    /// - `DispatchEngine` - New engine instance
    pub fn new(
        db: DatabaseConnection,
        gateway: Arc<dyn DeliveryGateway>,
        clock: Arc<dyn Clock>,
        config: DispatchConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            db,
            gateway,
            clock,
            config,
            shutdown,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn repository(&self) -> BroadcastJobRepository<'_> {
        BroadcastJobRepository::new(&self.db)
    }

    fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Drains the engine after the shutdown signal has been raised.
    ///
    /// Waits up to the configured grace period for in-flight deliveries to
    /// resolve, then returns anything still marked dispatching to the queue
    /// so the next start can pick it up. Call only after sending `true` on
    /// the shutdown channel; deliveries observe the signal and wind down on
    /// their own.
    ///
    /// # Returns
    /// - `Ok(())` - Engine drained; no job left in dispatching state
    /// - `Err(AppError::StoreErr)` - Database error during the final sweep
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let deadline = tokio::time::Instant::now() + self.config.shutdown_grace;

        while self.in_flight.load(Ordering::SeqCst) > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        let leftover = self.in_flight.load(Ordering::SeqCst);
        if leftover > 0 {
            tracing::warn!(
                "{} deliveries still in flight after grace period, abandoning them",
                leftover
            );
        }

        let released = self
            .repository()
            .release_dispatching(self.clock.now())
            .await?;
        if released > 0 {
            tracing::info!("Returned {} dispatching broadcasts to pending during shutdown", released);
        }

        Ok(())
    }
}
