//! Per-platform spin thresholds.
//!
//! The threshold is the slice before a deadline that is busy-polled instead of
//! parked. It has to cover the typical overshoot of the native timed wait:
//! Windows waits are quantized to the system timer resolution, Linux futex
//! waits usually land within tens of microseconds.

use std::time::Duration;

/// Default spin threshold on Windows.
#[cfg(target_os = "windows")]
pub const DEFAULT_SPIN_THRESHOLD: Duration = Duration::from_millis(3);

/// Default spin threshold on Linux.
#[cfg(target_os = "linux")]
pub const DEFAULT_SPIN_THRESHOLD: Duration = Duration::from_micros(200);

/// Default spin threshold on other platforms.
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub const DEFAULT_SPIN_THRESHOLD: Duration = Duration::from_millis(1);
