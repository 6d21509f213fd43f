//! Broadcast job factory for creating test broadcast entities.
//!
//! This module provides factory methods for creating broadcast job entities
//! with sensible defaults, reducing boilerplate in tests. The factory supports
//! customization through a builder pattern.

use crate::factory::helpers::next_id;
use chrono::Utc;
use entity::broadcast_job::JobStatus;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test broadcast jobs with customizable fields.
///
/// Provides a builder pattern for creating broadcast job entities with default
/// values that can be overridden as needed for specific test scenarios.
///
/// # Example
///
/// ```rust,ignore
/// use entity::broadcast_job::JobStatus;
/// use test_utils::factory::broadcast_job::BroadcastJobFactory;
///
/// let job = BroadcastJobFactory::new(&db)
///     .title("Custom Broadcast")
///     .status(JobStatus::Dispatching)
///     .build()
///     .await?;
/// ```
pub struct BroadcastJobFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    channel_id: String,
    title: String,
    body: String,
    scheduled_at: chrono::DateTime<Utc>,
    status: JobStatus,
    attempts: i32,
    last_error: Option<String>,
    next_attempt_at: Option<chrono::DateTime<Utc>>,
}

impl<'a> BroadcastJobFactory<'a> {
    /// Creates a new BroadcastJobFactory with default values.
    ///
    /// Defaults:
    /// - guild_id / channel_id: unique snowflake-style numeric strings
    /// - title: `"Broadcast {id}"` where id is auto-incremented
    /// - body: `"Test broadcast body"`
    /// - scheduled_at: 1 hour from now
    /// - status: `JobStatus::Pending`
    /// - attempts: `0`
    /// - last_error / next_attempt_at: `None`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `BroadcastJobFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            guild_id: (900_000_000_000_000_000 + id).to_string(),
            channel_id: (800_000_000_000_000_000 + id).to_string(),
            title: format!("Broadcast {}", id),
            body: "Test broadcast body".to_string(),
            scheduled_at: Utc::now() + chrono::Duration::hours(1),
            status: JobStatus::Pending,
            attempts: 0,
            last_error: None,
            next_attempt_at: None,
        }
    }

    /// Sets the destination guild ID.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID the broadcast targets
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Sets the destination channel ID.
    ///
    /// # Arguments
    /// - `channel_id` - Discord channel ID the broadcast targets
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    /// Sets the broadcast title.
    ///
    /// # Arguments
    /// - `title` - Title line of the broadcast message
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the broadcast body.
    ///
    /// # Arguments
    /// - `body` - Body text of the broadcast message
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the scheduled delivery time.
    ///
    /// # Arguments
    /// - `scheduled_at` - Instant the broadcast becomes due
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn scheduled_at(mut self, scheduled_at: chrono::DateTime<Utc>) -> Self {
        self.scheduled_at = scheduled_at;
        self
    }

    /// Sets the job status.
    ///
    /// # Arguments
    /// - `status` - Lifecycle state to create the job in
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the recorded attempt count.
    ///
    /// # Arguments
    /// - `attempts` - Number of completed delivery attempts
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn attempts(mut self, attempts: i32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Sets the last delivery error.
    ///
    /// # Arguments
    /// - `last_error` - Optional error text from the most recent attempt
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn last_error(mut self, last_error: Option<String>) -> Self {
        self.last_error = last_error;
        self
    }

    /// Sets the retry eligibility time.
    ///
    /// # Arguments
    /// - `next_attempt_at` - Optional instant the job becomes retryable
    ///
    /// # Returns
    /// - `Self` - Factory instance for method chaining
    pub fn next_attempt_at(mut self, next_attempt_at: Option<chrono::DateTime<Utc>>) -> Self {
        self.next_attempt_at = next_attempt_at;
        self
    }

    /// Builds and inserts the broadcast job entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::broadcast_job::Model)` - Created broadcast job entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::broadcast_job::Model, DbErr> {
        entity::broadcast_job::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            channel_id: ActiveValue::Set(self.channel_id),
            title: ActiveValue::Set(self.title),
            body: ActiveValue::Set(self.body),
            scheduled_at: ActiveValue::Set(self.scheduled_at),
            status: ActiveValue::Set(self.status),
            attempts: ActiveValue::Set(self.attempts),
            last_error: ActiveValue::Set(self.last_error),
            next_attempt_at: ActiveValue::Set(self.next_attempt_at),
            created_at: ActiveValue::Set(Utc::now()),
            updated_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a broadcast job with default values.
///
/// Shorthand for `BroadcastJobFactory::new(db).build().await`. The job is
/// pending and scheduled one hour in the future, so it is not yet due.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::broadcast_job::Model)` - Created broadcast job entity
/// - `Err(DbErr)` - Database error during insert
///
/// # Example
///
/// ```rust,ignore
/// let job = create_broadcast_job(&db).await?;
/// ```
pub async fn create_broadcast_job(
    db: &DatabaseConnection,
) -> Result<entity::broadcast_job::Model, DbErr> {
    BroadcastJobFactory::new(db).build().await
}

/// Creates a pending broadcast job whose scheduled time has already passed.
///
/// The job is scheduled one minute in the past, making it immediately
/// claimable by the dispatch engine.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::broadcast_job::Model)` - Created broadcast job entity
/// - `Err(DbErr)` - Database error during insert
pub async fn create_due_broadcast_job(
    db: &DatabaseConnection,
) -> Result<entity::broadcast_job::Model, DbErr> {
    BroadcastJobFactory::new(db)
        .scheduled_at(Utc::now() - chrono::Duration::minutes(1))
        .build()
        .await
}
