//! Interval validation and change modes.

use crate::error::{TimerError, TimerResult};
use std::time::Duration;

/// Largest accepted interval (one year).
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 3600);

/// When a new interval takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntervalChange {
    /// Re-target to `now + interval` and interrupt any wait in progress.
    #[default]
    Immediate,
    /// Store the value only; the next checkpoint schedules with it.
    Deferred,
}

/// Validate an interval given in seconds.
///
/// # Errors
///
/// Returns [`TimerError::InvalidInterval`] for negative, non-finite or
/// oversized values.
pub fn interval_from_secs(seconds: f64) -> TimerResult<Duration> {
    if !seconds.is_finite() {
        return Err(TimerError::invalid_interval(seconds, "must be finite"));
    }
    if seconds < 0.0 {
        return Err(TimerError::invalid_interval(seconds, "must be non-negative"));
    }
    if seconds > MAX_INTERVAL.as_secs_f64() {
        return Err(TimerError::invalid_interval(
            seconds,
            format!("exceeds maximum of {}s", MAX_INTERVAL.as_secs()),
        ));
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|source| TimerError::invalid_interval(seconds, source.to_string()))
}

/// Validate an interval given as a [`Duration`].
///
/// # Errors
///
/// Returns [`TimerError::InvalidInterval`] when `interval` exceeds
/// [`MAX_INTERVAL`].
pub fn check_interval(interval: Duration) -> TimerResult<Duration> {
    if interval > MAX_INTERVAL {
        return Err(TimerError::invalid_interval(
            interval.as_secs_f64(),
            format!("exceeds maximum of {}s", MAX_INTERVAL.as_secs()),
        ));
    }
    Ok(interval)
}
