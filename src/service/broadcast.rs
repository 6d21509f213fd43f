//! Caller-facing API for scheduling and inspecting broadcasts.
//!
//! This module provides the `BroadcastService` used by the embedding
//! application to enqueue broadcasts, check on their progress, and cancel
//! ones that have not started dispatching yet. Delivery itself is driven by
//! the dispatch engine, never from here.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    data::broadcast_job::BroadcastJobRepository,
    error::{store::StoreError, AppError},
    model::broadcast::{BroadcastJob, ScheduleBroadcastParams},
};

/// Service exposing the broadcast scheduling operations.
pub struct BroadcastService<'a> {
    /// Database connection for accessing broadcast jobs via the repository
    db: &'a DatabaseConnection,
}

impl<'a> BroadcastService<'a> {
    /// Creates a new BroadcastService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `BroadcastService` - New service instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and enqueues a new broadcast.
    ///
    /// The scheduled time may be in the past; such a job simply becomes due
    /// on the next dispatch tick.
    ///
    /// # Arguments
    /// - `params` - Destination, message content, and scheduled time
    ///
    /// # Returns
    /// - `Ok(BroadcastJob)` - The pending job, including its assigned ID
    /// - `Err(AppError::StoreErr)` - Validation rejection or database error
    pub async fn schedule_broadcast(
        &self,
        params: ScheduleBroadcastParams,
    ) -> Result<BroadcastJob, AppError> {
        let job = BroadcastJobRepository::new(self.db).enqueue(params).await?;

        tracing::info!(
            "Scheduled broadcast {} for channel {} in guild {} at {}",
            job.id,
            job.destination.channel_id,
            job.destination.guild_id,
            job.scheduled_at
        );

        Ok(job)
    }

    /// Gets the current state of a broadcast job.
    ///
    /// The returned job carries the status, attempt count, and last error,
    /// which is everything a caller needs to see how delivery is going.
    ///
    /// # Arguments
    /// - `id` - Job to look up
    ///
    /// # Returns
    /// - `Ok(BroadcastJob)` - The job as currently stored
    /// - `Err(AppError::StoreErr)` - `NotFound` for unknown IDs, or database error
    pub async fn get_job_status(&self, id: i32) -> Result<BroadcastJob, AppError> {
        let job = BroadcastJobRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        Ok(job)
    }

    /// Cancels a broadcast that has not started dispatching.
    ///
    /// Only pending jobs can be cancelled. A job already being dispatched,
    /// or one that finished in any terminal state, is rejected with
    /// `InvalidState` so the caller knows the delivery may have happened.
    ///
    /// # Arguments
    /// - `id` - Job to cancel
    ///
    /// # Returns
    /// - `Ok(BroadcastJob)` - The job, now cancelled
    /// - `Err(AppError::StoreErr)` - `NotFound`, `InvalidState`, or database error
    pub async fn cancel_job(&self, id: i32) -> Result<BroadcastJob, AppError> {
        let repository = BroadcastJobRepository::new(self.db);

        repository.cancel(id, Utc::now()).await?;
        let job = repository
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound(id))?;

        tracing::info!("Cancelled broadcast {}", id);

        Ok(job)
    }
}
