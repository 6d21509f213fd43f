use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::dispatch::DispatchEngine};

/// Starts the broadcast dispatch scheduler
///
/// Runs a dispatch tick on a fixed interval. Each tick requeues failed
/// broadcasts whose retry window has elapsed, claims due pending broadcasts,
/// and delivers them.
///
/// The returned handle must be kept alive for the lifetime of the process and
/// shut down before draining in-flight deliveries, so no new tick starts
/// while the engine is stopping.
///
/// # Arguments
/// - `engine`: Dispatch engine that owns the database, gateway, and clock
/// - `tick_interval`: Time between dispatch ticks
///
/// # Returns
/// - `Ok(JobScheduler)`: Running scheduler handle
/// - `Err(AppError::SchedulerErr)`: The scheduler could not be created or started
pub async fn start_scheduler(
    engine: DispatchEngine,
    tick_interval: Duration,
) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    // Clone resources for the job
    let job_engine = engine.clone();

    let job = Job::new_repeated_async(tick_interval, move |_uuid, _lock| {
        let engine = job_engine.clone();

        Box::pin(async move {
            match engine.run_tick().await {
                Ok(summary) if summary.is_noop() => {
                    tracing::debug!("Dispatch tick: nothing to do");
                }
                Ok(summary) => {
                    tracing::info!(
                        "Dispatch tick: {} requeued, {} claimed, {} sent, {} failed, {} abandoned",
                        summary.requeued,
                        summary.claimed,
                        summary.sent,
                        summary.failed,
                        summary.abandoned
                    );
                }
                Err(e) => {
                    tracing::error!("Error running dispatch tick: {}", e);
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(
        "Broadcast dispatch scheduler started, ticking every {}s",
        tick_interval.as_secs()
    );

    Ok(scheduler)
}
