//! Prelude for cadence-timer.
//!
//! ```rust
//! use cadence_timer::prelude::*;
//!
//! let timer = Timer::default();
//! assert_eq!(timer.state(), TimerState::Running);
//! timer.stop();
//! ```

pub use crate::config::{TimerConfig, TimerConfigBuilder};
pub use crate::driver::{InteractiveLoop, LoopStats, TimedLoop};
pub use crate::error::{TimerError, TimerResult};
pub use crate::interval::IntervalChange;
pub use crate::timer::{CheckpointOutcome, Timer, TimerState};
