use entity::broadcast_job::JobStatus;
use thiserror::Error;

/// Errors from schedule store operations on broadcast jobs.
///
/// `Validation`, `NotFound`, and `InvalidState` are caller-visible rejections;
/// `Db` wraps infrastructure failures from the database layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The broadcast request was rejected before anything was persisted.
    ///
    /// # Fields
    /// - Message describing which field was invalid and why
    #[error("{0}")]
    Validation(String),

    /// No broadcast job exists with the given ID.
    #[error("Broadcast job {0} not found")]
    NotFound(i32),

    /// The job is not in the state the operation requires.
    ///
    /// Returned, for example, when cancelling a job that is already being
    /// dispatched, or when a second claimer races a conditional transition.
    #[error("Broadcast job {id} is {actual}, expected {expected}")]
    InvalidState {
        id: i32,
        expected: JobStatus,
        actual: JobStatus,
    },

    /// Database operation error from SeaORM.
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}
