use sea_orm::entity::prelude::*;

/// A scheduled broadcast and its delivery bookkeeping.
///
/// Rows are only ever inserted in `Pending` state; every later change is a
/// status transition applied by the dispatch engine or the caller API.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "broadcast_job")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: String,
    pub channel_id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    /// Earliest instant the broadcast becomes due. Never updated after insert.
    pub scheduled_at: DateTimeUtc,
    pub status: JobStatus,
    /// Number of completed delivery attempts. Only ever increments.
    pub attempts: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,
    /// When a failed job becomes eligible for redelivery. `None` once the
    /// retry budget is spent or the failure was permanent.
    pub next_attempt_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Lifecycle state of a broadcast job.
///
/// `Pending -> Dispatching -> Sent | Failed`, with `Failed -> Pending` when a
/// retry is due and `Pending -> Cancelled` on caller request. `Sent`,
/// `Cancelled`, and `Failed` without a retry window are terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum JobStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "dispatching")]
    Dispatching,
    #[sea_orm(string_value = "sent")]
    Sent,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobStatus::Pending => "pending",
            JobStatus::Dispatching => "dispatching",
            JobStatus::Sent => "sent",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
