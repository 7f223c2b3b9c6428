//! Countdown model driven by a checkpoint timer.
//!
//! The display side is left to the caller: [`spawn_clock`] checkpoints a
//! timer on its own thread and sends each [`CountdownStatus`] over a
//! single-slot channel.

use crate::duration::parse_duration;
use crate::error::DurationParseError;
use crate::timer::Timer;
use crossbeam::channel::{self, Receiver, TrySendError};
use std::fmt;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long `Finished` is reported before the countdown turns overdue.
pub const FINISHED_HOLD: Duration = Duration::from_secs(5);

/// State of a countdown at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStatus {
    /// Time left, rounded to whole seconds.
    Counting(Duration),
    /// Zero reached less than [`FINISHED_HOLD`] ago.
    Finished,
    /// Zero passed by at least [`FINISHED_HOLD`], rounded to whole seconds.
    Overdue(Duration),
}

impl fmt::Display for CountdownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counting(remaining) => f.write_str(&format_hms(*remaining)),
            Self::Finished => f.write_str("Done!"),
            Self::Overdue(by) => write!(f, "- {}", format_hms(*by)),
        }
    }
}

/// Format a duration as `h:mm:ss`, dropping sub-second parts.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

/// Countdown of a fixed total duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    total: Duration,
}

impl Countdown {
    /// Create a countdown of `total`.
    pub fn new(total: Duration) -> Self {
        Self { total }
    }

    /// Create a countdown from an `h:m:s` string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not parse.
    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        parse_duration(input).map(Self::new)
    }

    /// Total duration.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Status after `elapsed` of counting.
    pub fn status(&self, elapsed: Duration) -> CountdownStatus {
        let remaining = (self.total.as_secs_f64() - elapsed.as_secs_f64()).round();

        if remaining > 0.0 {
            CountdownStatus::Counting(whole_seconds(remaining))
        } else if remaining <= -FINISHED_HOLD.as_secs_f64() {
            CountdownStatus::Overdue(whole_seconds(-remaining))
        } else {
            CountdownStatus::Finished
        }
    }
}

fn whole_seconds(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

/// Spawn the clock thread of a countdown.
///
/// The thread checkpoints `timer` and offers the status after each checkpoint
/// until the timer is stopped or the receiver is dropped. The channel holds a
/// single status; one the receiver has not taken yet is kept and later ones
/// are skipped, so a slow reader never accumulates a backlog. The timer should
/// have a positive interval, otherwise the thread spins through checkpoints.
/// Stopping the timer is left to the caller.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_clock(
    timer: Arc<Timer>,
    countdown: Countdown,
) -> io::Result<(JoinHandle<()>, Receiver<CountdownStatus>)> {
    let (sender, receiver) = channel::bounded(1);
    let handle = thread::Builder::new()
        .name("cadence-countdown".to_string())
        .spawn(move || {
            while !timer.is_stopped() {
                timer.checkpoint();
                let status = countdown.status(timer.elapsed_time());
                match sender.try_send(status) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Disconnected(_)) => {
                        tracing::debug!("countdown receiver dropped");
                        break;
                    }
                }
            }
        })?;
    Ok((handle, receiver))
}
