use thiserror::Error;

/// Delivery failures reported by a gateway, split by retryability.
///
/// The dispatch engine treats the two classes differently: transient failures
/// are retried with backoff until the attempt budget runs out, permanent
/// failures stop the job immediately.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The attempt failed but a later one might succeed (network error, rate
    /// limit, Discord server error).
    #[error("Transient delivery failure: {0}")]
    Transient(String),

    /// No attempt can ever succeed (unknown channel, missing permissions,
    /// malformed destination).
    #[error("Permanent delivery failure: {0}")]
    Permanent(String),
}

impl DeliveryError {
    /// Whether the dispatch engine should schedule another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeliveryError::Transient(_))
    }
}
