//! Scoped timing measurement.
//!
//! A guard records the start of a block and writes the measurement into a
//! caller-owned slot when dropped, so the result is recorded on early return
//! and during unwinding as well.
//!
//! ```
//! use cadence_timer::measure::{DurationMeasurement, measure_duration};
//! use std::time::Duration;
//!
//! let mut measurement = DurationMeasurement::default();
//! {
//!     let _guard = measure_duration(&mut measurement);
//!     std::thread::sleep(Duration::from_millis(5));
//! }
//! assert!(measurement.duration >= Duration::from_millis(5));
//! ```

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

/// Monotonic duration of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationMeasurement {
    /// Time between entering and leaving the block.
    pub duration: Duration,
}

/// Wall-clock time of a block with its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeMeasurement {
    /// Midpoint between the wall-clock times at entry and exit.
    pub unix_time: DateTime<Utc>,
    /// Half the monotonic duration of the block.
    pub uncertainty: Duration,
}

impl TimeMeasurement {
    /// Midpoint as fractional seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> f64 {
        let since_epoch = self.unix_time.signed_duration_since(DateTime::<Utc>::UNIX_EPOCH);
        match since_epoch.to_std() {
            Ok(after) => after.as_secs_f64(),
            Err(_) => since_epoch.abs().to_std().map_or(0.0, |before| -before.as_secs_f64()),
        }
    }
}

/// Guard returned by [`measure_duration`].
#[derive(Debug)]
#[must_use = "the measurement is recorded when the guard is dropped"]
pub struct DurationGuard<'a> {
    start: Instant,
    slot: &'a mut DurationMeasurement,
}

impl Drop for DurationGuard<'_> {
    fn drop(&mut self) {
        self.slot.duration = self.start.elapsed();
    }
}

/// Start measuring the duration of the enclosing scope into `slot`.
pub fn measure_duration(slot: &mut DurationMeasurement) -> DurationGuard<'_> {
    DurationGuard {
        start: Instant::now(),
        slot,
    }
}

/// Guard returned by [`measure_time`].
#[derive(Debug)]
#[must_use = "the measurement is recorded when the guard is dropped"]
pub struct TimeGuard<'a> {
    wall_start: DateTime<Utc>,
    start: Instant,
    slot: &'a mut TimeMeasurement,
}

impl Drop for TimeGuard<'_> {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let wall_end = Utc::now();
        let half = wall_end.signed_duration_since(self.wall_start) / 2;

        self.slot.unix_time = self
            .wall_start
            .checked_add_signed(half)
            .unwrap_or(self.wall_start);
        self.slot.uncertainty = duration / 2;
    }
}

/// Start measuring the wall-clock time of the enclosing scope into `slot`.
pub fn measure_time(slot: &mut TimeMeasurement) -> TimeGuard<'_> {
    TimeGuard {
        wall_start: Utc::now(),
        start: Instant::now(),
        slot,
    }
}

/// Run `f` and return its value with the block's wall-clock measurement.
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, TimeMeasurement) {
    let mut measurement = TimeMeasurement::default();
    let value = {
        let _guard = measure_time(&mut measurement);
        f()
    };
    (value, measurement)
}

/// Run `f` and return its value with its monotonic duration.
pub fn clocked<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let mut measurement = DurationMeasurement::default();
    let value = {
        let _guard = measure_duration(&mut measurement);
        f()
    };
    (value, measurement.duration)
}
