//! Retry backoff policy for failed deliveries.

use std::time::Duration;

/// Largest doubling exponent applied to the base delay.
///
/// Keeps the shift inside u32 range; the configured maximum delay caps the
/// result long before this bound matters.
const MAX_EXPONENT: u32 = 16;

/// Computes the delay before a failed job becomes eligible for retry.
///
/// Exponential: `base * 2^attempts`, capped at `max`. `attempts` is the
/// attempt count recorded after the failure, so a job's first retry waits
/// `base * 2`, its second `base * 4`, and so on.
///
/// # Arguments
/// - `base` - Base retry delay from configuration
/// - `max` - Upper bound on the returned delay
/// - `attempts` - Completed delivery attempts including the one that just failed
///
/// # Returns
/// - `Duration` - How long to wait before the next attempt
pub fn backoff_delay(base: Duration, max: Duration, attempts: i32) -> Duration {
    let exponent = attempts.clamp(0, MAX_EXPONENT as i32) as u32;
    base.saturating_mul(1u32 << exponent).min(max)
}
