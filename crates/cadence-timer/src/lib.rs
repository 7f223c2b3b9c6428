//! Drift-free periodic checkpoints for loops of constant duration.
//!
//! A [`Timer`] paces a loop: call [`Timer::checkpoint`] once per iteration
//! and the loop runs at a fixed period regardless of how long each body
//! takes, as long as the body fits in the interval. Wake targets are absolute,
//! so timing errors do not accumulate. Other threads may pause, resume, stop,
//! reset or re-interval the timer at any time; a checkpoint blocked in its
//! wait is interrupted instead of running out its timeout.
//!
//! # Example
//!
//! ```
//! use cadence_timer::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), TimerError> {
//! let timer = Arc::new(Timer::new(0.01, "acquisition", false)?);
//! let control = Arc::clone(&timer);
//! let mut samples = 0;
//!
//! let stats = TimedLoop::new(timer, move || {
//!     samples += 1;
//!     if samples == 3 {
//!         control.stop();
//!     }
//! })
//! .run();
//!
//! assert_eq!(stats.iterations, 3);
//! # Ok(())
//! # }
//! ```
//!
//! Besides the timer the crate carries the tools built around it:
//! `h:m:s` duration parsing, scoped timing measurement, delayed calls, a
//! countdown model, a cadence accuracy harness and a line-oriented control
//! surface.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod control;
pub mod countdown;
pub mod delay;
pub mod driver;
pub mod duration;
pub mod error;
pub mod interval;
pub mod measure;
pub mod perf;
pub mod timer;

pub mod prelude;

pub use config::{TimerConfig, TimerConfigBuilder};
pub use control::{Command, Controller};
pub use driver::{InteractiveLoop, LoopStats, TimedLoop};
pub use duration::parse_duration;
pub use error::{DurationParseError, TimerError, TimerResult};
pub use interval::{IntervalChange, MAX_INTERVAL};
pub use timer::{CheckpointOutcome, Timer, TimerSnapshot, TimerState};
