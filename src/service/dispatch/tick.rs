//! One dispatch cycle: retry sweep, claim, delivery, outcome recording.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

use crate::{
    error::{delivery::DeliveryError, AppError},
    model::broadcast::{BroadcastJob, TickSummary},
};

use super::{backoff, DispatchEngine};

/// What a single claimed delivery resolved to.
enum JobOutcome {
    Sent,
    Failed,
    Abandoned,
}

impl DispatchEngine {
    /// Runs one dispatch tick.
    ///
    /// In order:
    /// 1. Bail out untouched if shutdown has been requested.
    /// 2. Requeue failed jobs whose retry window has elapsed, so they are
    ///    claimable in this same tick.
    /// 3. Claim up to `batch_size` due pending jobs.
    /// 4. Deliver the claimed jobs with at most `concurrency` in flight,
    ///    recording each outcome as it lands.
    ///
    /// A delivery or bookkeeping failure only affects its own job; the tick
    /// itself fails only when the store does.
    ///
    /// # Returns
    /// - `Ok(TickSummary)` - Counts of what the tick did
    /// - `Err(AppError::StoreErr)` - The retry sweep or claim hit a database error
    pub async fn run_tick(&self) -> Result<TickSummary, AppError> {
        let mut summary = TickSummary::default();

        if self.is_shutting_down() {
            return Ok(summary);
        }

        let now = self.clock.now();
        let repository = self.repository();

        let retry_ids = repository
            .find_retry_candidates(now, self.config.batch_size)
            .await?;
        for id in retry_ids {
            match repository.requeue(id, now).await {
                Ok(()) => summary.requeued += 1,
                Err(err) => {
                    tracing::error!("Failed to requeue broadcast {} for retry: {}", id, err);
                }
            }
        }

        let claimed = repository.claim_due(now, self.config.batch_size).await?;
        summary.claimed = claimed.len();

        if claimed.is_empty() {
            return Ok(summary);
        }

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut deliveries = JoinSet::new();

        for job in claimed {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("delivery semaphore is never closed");
            let engine = self.clone();

            self.in_flight.fetch_add(1, Ordering::SeqCst);
            deliveries.spawn(async move {
                let _permit = permit;
                let outcome = engine.deliver(job).await;
                engine.in_flight.fetch_sub(1, Ordering::SeqCst);
                outcome
            });
        }

        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok(JobOutcome::Sent) => summary.sent += 1,
                Ok(JobOutcome::Failed) => summary.failed += 1,
                Ok(JobOutcome::Abandoned) => summary.abandoned += 1,
                Err(err) => tracing::error!("Delivery task failed to run: {}", err),
            }
        }

        Ok(summary)
    }

    /// Delivers one claimed job and records its outcome.
    ///
    /// Never returns an error: failures are folded into the outcome so one
    /// job cannot abort the tick. The gateway call races the shutdown
    /// signal; losing that race abandons the job back to pending.
    async fn deliver(&self, job: BroadcastJob) -> JobOutcome {
        let mut shutdown = self.shutdown.clone();

        tokio::select! {
            result = self.gateway.send(&job.destination, &job.title, &job.body) => match result {
                Ok(()) => self.record_sent(&job).await,
                Err(err) => self.record_failure(&job, err).await,
            },
            _ = shutdown_raised(&mut shutdown) => self.abandon(&job).await,
        }
    }

    async fn record_sent(&self, job: &BroadcastJob) -> JobOutcome {
        tracing::info!(
            "Delivered broadcast {} to channel {} in guild {}",
            job.id,
            job.destination.channel_id,
            job.destination.guild_id
        );

        if let Err(err) = self.repository().mark_sent(job.id, self.clock.now()).await {
            tracing::error!("Failed to record broadcast {} as sent: {}", job.id, err);
        }

        JobOutcome::Sent
    }

    /// Records a failed attempt and decides whether it gets a retry window.
    ///
    /// A retry window is set only for transient failures with attempt budget
    /// left. Permanent failures and exhausted budgets leave it empty, which
    /// parks the job in `Failed` for good.
    async fn record_failure(&self, job: &BroadcastJob, error: DeliveryError) -> JobOutcome {
        let now = self.clock.now();
        // claim_due handed this task exclusive ownership, so the stored
        // counter cannot have moved since the snapshot.
        let attempts = job.attempts + 1;

        let next_attempt_at = if error.is_retryable() && attempts < self.config.max_attempts {
            let delay =
                backoff::backoff_delay(self.config.base_delay, self.config.max_delay, attempts);
            Some(now + chrono::Duration::seconds(delay.as_secs() as i64))
        } else {
            None
        };

        match next_attempt_at {
            Some(at) => tracing::warn!(
                "Broadcast {} failed on attempt {}, retrying at {}: {}",
                job.id,
                attempts,
                at,
                error
            ),
            None => tracing::error!(
                "Broadcast {} failed for good after {} attempt(s): {}",
                job.id,
                attempts,
                error
            ),
        }

        if let Err(err) = self
            .repository()
            .mark_failed(job.id, &error.to_string(), next_attempt_at, now)
            .await
        {
            tracing::error!("Failed to record failure for broadcast {}: {}", job.id, err);
        }

        JobOutcome::Failed
    }

    /// Returns an interrupted delivery to the queue.
    ///
    /// The gateway call was dropped mid-flight, so the outcome is unknown.
    /// The job goes back to pending and the interrupted attempt is not
    /// counted against the budget.
    async fn abandon(&self, job: &BroadcastJob) -> JobOutcome {
        tracing::warn!("Abandoning in-flight broadcast {} for shutdown", job.id);

        if let Err(err) = self.repository().abandon(job.id, self.clock.now()).await {
            tracing::error!("Failed to return broadcast {} to pending: {}", job.id, err);
        }

        JobOutcome::Abandoned
    }
}

/// Resolves once the shutdown flag is raised.
///
/// A dropped sender also resolves it; that only happens when the process is
/// tearing down anyway.
async fn shutdown_raised(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
