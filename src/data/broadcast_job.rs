use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::{Expr, ExprTrait},
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use entity::broadcast_job::{self, JobStatus};
use entity::prelude::BroadcastJob as BroadcastJobEntity;

use crate::{
    error::store::StoreError,
    model::broadcast::{BroadcastJob, ScheduleBroadcastParams},
};

/// Repository for broadcast job persistence and state transitions.
///
/// All transitions are conditional updates filtered on the current status, so
/// two engines (or an engine and the caller API) racing on the same job can
/// never both win: the loser's update matches zero rows.
pub struct BroadcastJobRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BroadcastJobRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and inserts a new broadcast job in `Pending` state.
    ///
    /// # Arguments
    /// - `params`: Destination, message content, and scheduled time
    ///
    /// # Returns
    /// - `Ok(BroadcastJob)`: The created job with zero attempts
    /// - `Err(StoreError::Validation)`: Empty destination, or both title and body empty
    /// - `Err(StoreError::Db)`: Database error
    pub async fn enqueue(
        &self,
        params: ScheduleBroadcastParams,
    ) -> Result<BroadcastJob, StoreError> {
        if params.destination.guild_id.trim().is_empty() {
            return Err(StoreError::Validation(
                "Destination guild ID must not be empty".to_string(),
            ));
        }
        if params.destination.channel_id.trim().is_empty() {
            return Err(StoreError::Validation(
                "Destination channel ID must not be empty".to_string(),
            ));
        }
        if params.title.trim().is_empty() && params.body.trim().is_empty() {
            return Err(StoreError::Validation(
                "Broadcast title and body must not both be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let job = broadcast_job::ActiveModel {
            guild_id: ActiveValue::Set(params.destination.guild_id),
            channel_id: ActiveValue::Set(params.destination.channel_id),
            title: ActiveValue::Set(params.title),
            body: ActiveValue::Set(params.body),
            scheduled_at: ActiveValue::Set(params.scheduled_at),
            status: ActiveValue::Set(JobStatus::Pending),
            attempts: ActiveValue::Set(0),
            last_error: ActiveValue::Set(None),
            next_attempt_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        Ok(BroadcastJob::from_entity(job))
    }

    /// Gets a broadcast job by ID.
    ///
    /// # Returns
    /// - `Ok(Some(BroadcastJob))`: The job
    /// - `Ok(None)`: No job with that ID
    /// - `Err(StoreError::Db)`: Database error
    pub async fn find_by_id(&self, id: i32) -> Result<Option<BroadcastJob>, StoreError> {
        let job = BroadcastJobEntity::find_by_id(id).one(self.db).await?;

        Ok(job.map(BroadcastJob::from_entity))
    }

    /// Claims up to `limit` due pending jobs for dispatch, oldest first.
    ///
    /// Each candidate is moved `Pending -> Dispatching` with a conditional
    /// update; a candidate grabbed by a concurrent claimer in the meantime
    /// matches zero rows and is skipped, so no job is ever claimed twice.
    ///
    /// # Arguments
    /// - `now`: Cutoff instant; only jobs with `scheduled_at <= now` are due
    /// - `limit`: Maximum number of jobs to claim
    ///
    /// # Returns
    /// - `Ok(Vec<BroadcastJob>)`: The jobs this caller now exclusively owns
    /// - `Err(StoreError::Db)`: Database error
    pub async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<BroadcastJob>, StoreError> {
        let candidates = BroadcastJobEntity::find()
            .filter(broadcast_job::Column::Status.eq(JobStatus::Pending))
            .filter(broadcast_job::Column::ScheduledAt.lte(now))
            .order_by_asc(broadcast_job::Column::ScheduledAt)
            .limit(limit)
            .all(self.db)
            .await?;

        let mut claimed = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let result = BroadcastJobEntity::update_many()
                .set(broadcast_job::ActiveModel {
                    status: ActiveValue::Set(JobStatus::Dispatching),
                    updated_at: ActiveValue::Set(now),
                    ..Default::default()
                })
                .filter(broadcast_job::Column::Id.eq(candidate.id))
                .filter(broadcast_job::Column::Status.eq(JobStatus::Pending))
                .exec(self.db)
                .await?;

            // Zero rows means a concurrent claimer won the race for this job.
            if result.rows_affected == 1 {
                claimed.push(BroadcastJob::from_entity(broadcast_job::Model {
                    status: JobStatus::Dispatching,
                    updated_at: now,
                    ..candidate
                }));
            }
        }

        Ok(claimed)
    }

    /// Records a successful delivery, moving the job `Dispatching -> Sent`.
    ///
    /// # Returns
    /// - `Ok(())`: The job is now sent
    /// - `Err(StoreError::NotFound)`: No job with that ID
    /// - `Err(StoreError::InvalidState)`: The job was not dispatching
    /// - `Err(StoreError::Db)`: Database error
    pub async fn mark_sent(&self, id: i32, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.transition(
            id,
            JobStatus::Dispatching,
            broadcast_job::ActiveModel {
                status: ActiveValue::Set(JobStatus::Sent),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            },
        )
        .await
    }

    /// Records a failed delivery attempt, moving the job `Dispatching -> Failed`.
    ///
    /// Increments the attempt counter in the database, stores the error text,
    /// and records when the job becomes eligible for retry. Passing `None` for
    /// `next_attempt_at` marks the failure terminal: the retry sweep will
    /// never pick the job up again.
    ///
    /// # Arguments
    /// - `id`: Job to update
    /// - `error_text`: Human-readable description of the failure
    /// - `next_attempt_at`: When the retry sweep may requeue the job, if ever
    /// - `now`: Timestamp recorded as the update time
    ///
    /// # Returns
    /// - `Ok(())`: Failure recorded
    /// - `Err(StoreError::NotFound)`: No job with that ID
    /// - `Err(StoreError::InvalidState)`: The job was not dispatching
    /// - `Err(StoreError::Db)`: Database error
    pub async fn mark_failed(
        &self,
        id: i32,
        error_text: &str,
        next_attempt_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = BroadcastJobEntity::update_many()
            .col_expr(broadcast_job::Column::Status, Expr::value(JobStatus::Failed))
            .col_expr(
                broadcast_job::Column::Attempts,
                Expr::col(broadcast_job::Column::Attempts).add(1),
            )
            .col_expr(
                broadcast_job::Column::LastError,
                Expr::value(Some(error_text.to_string())),
            )
            .col_expr(
                broadcast_job::Column::NextAttemptAt,
                Expr::value(next_attempt_at),
            )
            .col_expr(broadcast_job::Column::UpdatedAt, Expr::value(now))
            .filter(broadcast_job::Column::Id.eq(id))
            .filter(broadcast_job::Column::Status.eq(JobStatus::Dispatching))
            .exec(self.db)
            .await?;

        if result.rows_affected == 1 {
            return Ok(());
        }

        Err(self.state_error(id, JobStatus::Dispatching).await)
    }

    /// Returns a failed job to the queue, moving it `Failed -> Pending`.
    ///
    /// Clears the retry window; the attempt counter and last error are kept
    /// so the job's history survives the requeue.
    ///
    /// # Returns
    /// - `Ok(())`: The job is pending again
    /// - `Err(StoreError::NotFound)`: No job with that ID
    /// - `Err(StoreError::InvalidState)`: The job was not failed
    /// - `Err(StoreError::Db)`: Database error
    pub async fn requeue(&self, id: i32, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.transition(
            id,
            JobStatus::Failed,
            broadcast_job::ActiveModel {
                status: ActiveValue::Set(JobStatus::Pending),
                next_attempt_at: ActiveValue::Set(None),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            },
        )
        .await
    }

    /// Cancels a pending job, moving it `Pending -> Cancelled`.
    ///
    /// Only pending jobs can be cancelled: once dispatch has begun the
    /// delivery may already have happened, and terminal states are final.
    ///
    /// # Returns
    /// - `Ok(())`: The job is cancelled and will never be claimed
    /// - `Err(StoreError::NotFound)`: No job with that ID
    /// - `Err(StoreError::InvalidState)`: The job was not pending
    /// - `Err(StoreError::Db)`: Database error
    pub async fn cancel(&self, id: i32, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.transition(
            id,
            JobStatus::Pending,
            broadcast_job::ActiveModel {
                status: ActiveValue::Set(JobStatus::Cancelled),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            },
        )
        .await
    }

    /// Returns one abandoned in-flight job to the queue, `Dispatching -> Pending`.
    ///
    /// Used when shutdown interrupts a delivery whose outcome is unknown. The
    /// attempt counter is not touched; the interrupted attempt never completed.
    ///
    /// # Returns
    /// - `Ok(())`: The job is pending again
    /// - `Err(StoreError::NotFound)`: No job with that ID
    /// - `Err(StoreError::InvalidState)`: The job was not dispatching
    /// - `Err(StoreError::Db)`: Database error
    pub async fn abandon(&self, id: i32, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.transition(
            id,
            JobStatus::Dispatching,
            broadcast_job::ActiveModel {
                status: ActiveValue::Set(JobStatus::Pending),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            },
        )
        .await
    }

    /// Returns every dispatching job to the queue in one sweep.
    ///
    /// Run at startup to recover jobs stranded by a crash, and at the end of
    /// shutdown to catch deliveries the grace period did not resolve.
    ///
    /// # Returns
    /// - `Ok(u64)`: Number of jobs returned to pending
    /// - `Err(StoreError::Db)`: Database error
    pub async fn release_dispatching(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = BroadcastJobEntity::update_many()
            .set(broadcast_job::ActiveModel {
                status: ActiveValue::Set(JobStatus::Pending),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            })
            .filter(broadcast_job::Column::Status.eq(JobStatus::Dispatching))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Finds failed jobs whose retry window has elapsed, oldest window first.
    ///
    /// Jobs with no `next_attempt_at` are terminal failures and are never
    /// returned.
    ///
    /// # Arguments
    /// - `now`: Cutoff instant; only jobs with `next_attempt_at <= now` match
    /// - `limit`: Maximum number of job IDs to return
    ///
    /// # Returns
    /// - `Ok(Vec<i32>)`: IDs of jobs ready to be requeued
    /// - `Err(StoreError::Db)`: Database error
    pub async fn find_retry_candidates(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<i32>, StoreError> {
        let jobs = BroadcastJobEntity::find()
            .filter(broadcast_job::Column::Status.eq(JobStatus::Failed))
            .filter(broadcast_job::Column::NextAttemptAt.is_not_null())
            .filter(broadcast_job::Column::NextAttemptAt.lte(now))
            .order_by_asc(broadcast_job::Column::NextAttemptAt)
            .limit(limit)
            .all(self.db)
            .await?;

        Ok(jobs.into_iter().map(|job| job.id).collect())
    }

    /// Counts jobs per lifecycle state.
    ///
    /// # Returns
    /// - `Ok(Vec<(JobStatus, u64)>)`: One entry per status, including zeroes
    /// - `Err(StoreError::Db)`: Database error
    pub async fn count_by_status(&self) -> Result<Vec<(JobStatus, u64)>, StoreError> {
        let statuses = [
            JobStatus::Pending,
            JobStatus::Dispatching,
            JobStatus::Sent,
            JobStatus::Failed,
            JobStatus::Cancelled,
        ];

        let mut counts = Vec::with_capacity(statuses.len());
        for status in statuses {
            let count = BroadcastJobEntity::find()
                .filter(broadcast_job::Column::Status.eq(status))
                .count(self.db)
                .await?;
            counts.push((status, count));
        }

        Ok(counts)
    }

    /// Applies `change` only while the job currently has `expected` status.
    async fn transition(
        &self,
        id: i32,
        expected: JobStatus,
        change: broadcast_job::ActiveModel,
    ) -> Result<(), StoreError> {
        let result = BroadcastJobEntity::update_many()
            .set(change)
            .filter(broadcast_job::Column::Id.eq(id))
            .filter(broadcast_job::Column::Status.eq(expected))
            .exec(self.db)
            .await?;

        if result.rows_affected == 1 {
            return Ok(());
        }

        Err(self.state_error(id, expected).await)
    }

    /// Explains a conditional update that matched zero rows: either the job
    /// does not exist, or it is in a different state than required.
    ///
    /// The status is read after the failed update, so a writer landing in
    /// between can move the row again; the reported `actual` is a best-effort
    /// snapshot, not the state that made the update miss.
    async fn state_error(&self, id: i32, expected: JobStatus) -> StoreError {
        match BroadcastJobEntity::find_by_id(id).one(self.db).await {
            Ok(Some(job)) => StoreError::InvalidState {
                id,
                expected,
                actual: job.status,
            },
            Ok(None) => StoreError::NotFound(id),
            Err(err) => StoreError::Db(err),
        }
    }
}
