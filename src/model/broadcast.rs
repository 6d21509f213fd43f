//! Domain models for broadcast scheduling and dispatch.
//!
//! Defines the broadcast job domain model, destination addressing, and the
//! parameter and summary types used by the caller API and dispatch engine.

use chrono::{DateTime, Utc};

pub use entity::broadcast_job::JobStatus;

/// Addressable target of a broadcast: a guild and one of its channels.
///
/// Both IDs are opaque Discord snowflakes stored as strings; the store only
/// checks that they are non-empty, and the gateway interprets them at
/// delivery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Discord guild ID the broadcast targets (stored as String).
    pub guild_id: String,
    /// Discord channel ID within the guild (stored as String).
    pub channel_id: String,
}

impl Destination {
    pub fn new(guild_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            guild_id: guild_id.into(),
            channel_id: channel_id.into(),
        }
    }
}

/// A scheduled announcement with its delivery state.
///
/// Tracks the destination, message content, scheduled time, and the retry
/// bookkeeping the dispatch engine maintains across delivery attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastJob {
    /// Unique identifier for the broadcast job.
    pub id: i32,
    /// Guild and channel the broadcast is delivered to.
    pub destination: Destination,
    /// Title line of the broadcast message.
    pub title: String,
    /// Body text of the broadcast message.
    pub body: String,
    /// Earliest instant the broadcast becomes due. Immutable after creation.
    pub scheduled_at: DateTime<Utc>,
    /// Current lifecycle state of the job.
    pub status: JobStatus,
    /// Number of completed delivery attempts.
    pub attempts: i32,
    /// Error text from the most recent failed attempt, if any.
    pub last_error: Option<String>,
    /// When a failed job becomes eligible for redelivery, if a retry is planned.
    pub next_attempt_at: Option<DateTime<Utc>>,
    /// Timestamp when the job was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the most recent state change.
    pub updated_at: DateTime<Utc>,
}

impl BroadcastJob {
    /// Converts an entity model to a broadcast job domain model at the
    /// repository boundary.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `BroadcastJob` - The converted broadcast job domain model
    pub fn from_entity(entity: entity::broadcast_job::Model) -> Self {
        Self {
            id: entity.id,
            destination: Destination {
                guild_id: entity.guild_id,
                channel_id: entity.channel_id,
            },
            title: entity.title,
            body: entity.body,
            scheduled_at: entity.scheduled_at,
            status: entity.status,
            attempts: entity.attempts,
            last_error: entity.last_error,
            next_attempt_at: entity.next_attempt_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Parameters for scheduling a new broadcast.
#[derive(Debug, Clone)]
pub struct ScheduleBroadcastParams {
    /// Guild and channel to deliver the broadcast to.
    pub destination: Destination,
    /// Title line of the broadcast message.
    pub title: String,
    /// Body text of the broadcast message.
    pub body: String,
    /// Instant the broadcast becomes due. Past instants are legal and make
    /// the job due on the next tick.
    pub scheduled_at: DateTime<Utc>,
}

/// Outcome counts for one dispatch tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Failed jobs returned to pending because their backoff elapsed.
    pub requeued: usize,
    /// Due jobs this tick claimed for delivery.
    pub claimed: usize,
    /// Deliveries that succeeded.
    pub sent: usize,
    /// Deliveries that failed and were recorded against the job.
    pub failed: usize,
    /// Deliveries abandoned because shutdown interrupted them.
    pub abandoned: usize,
}

impl TickSummary {
    /// True when the tick neither requeued nor claimed anything.
    pub fn is_noop(&self) -> bool {
        self.requeued == 0 && self.claimed == 0
    }
}
