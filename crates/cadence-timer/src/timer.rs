//! Drift-free checkpoint timer.
//!
//! [`Timer::checkpoint`] schedules against absolute targets: every on-time
//! checkpoint advances the target by exactly one interval from the previous
//! target, so the release instants form an arithmetic progression anchored at
//! the last reset, independent of how long the loop body took. A body that
//! overruns the interval resynchronizes the schedule to `now + interval`
//! instead of trying to catch up.
//!
//! All mutable state sits behind one mutex. The two [`PrecisionEvent`]s are
//! the only places a thread blocks, and they are always waited on with the
//! mutex released, so control operations from other threads complete in
//! constant time and interrupt a wait in progress.

use crate::config::TimerConfig;
use crate::error::TimerResult;
use crate::interval::{IntervalChange, check_interval, interval_from_secs};
use cadence_event::{DEFAULT_SPIN_THRESHOLD, PrecisionEvent};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Lifecycle state of a [`Timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerState {
    /// Checkpoints hold the cadence.
    Running,
    /// Checkpoints block until [`Timer::resume`].
    Paused,
    /// Terminal until [`Timer::reset`]; checkpoints return immediately.
    Stopped,
}

/// Which branch a call to [`Timer::checkpoint`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckpointOutcome {
    /// The target was ahead; the call waited until it.
    OnTime {
        /// Time spent waiting.
        waited: Duration,
    },
    /// The wait was cut short by a pause, stop, reset or interval change.
    Interrupted,
    /// The target had already passed; the schedule was resynchronized.
    Overrun {
        /// How far past the target the call arrived.
        late: Duration,
    },
    /// The timer was paused and has been resumed; the next interval starts now.
    Resumed,
    /// Zero interval: nothing to wait for.
    Passthrough,
    /// The timer is stopped.
    Stopped,
}

/// Consistent view of the timer taken under a single lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// Current state.
    pub state: TimerState,
    /// Current interval.
    pub interval: Duration,
    /// Time since the last reset, excluding paused time.
    pub elapsed: Duration,
    /// Accumulated paused time, including an ongoing pause.
    pub paused: Duration,
    /// Time since the last reset.
    pub total: Duration,
    /// Distance between now and the next target.
    pub until_target: Duration,
    /// Whether the next target is already in the past.
    pub target_passed: bool,
}

impl TimerSnapshot {
    /// Signed seconds until the next target; negative once it has passed.
    pub fn until_target_secs(&self) -> f64 {
        let secs = self.until_target.as_secs_f64();
        if self.target_passed { -secs } else { secs }
    }
}

#[derive(Debug)]
struct Schedule {
    interval: Duration,
    target: Instant,
    start_time: Instant,
    paused_total: Duration,
    paused_at: Option<Instant>,
    stopped_at: Option<Instant>,
    state: TimerState,
    interval_failed: bool,
    warnings: bool,
}

impl Schedule {
    fn started(interval: Duration, warnings: bool, now: Instant) -> Self {
        Self {
            interval,
            target: later(now, interval),
            start_time: now,
            paused_total: Duration::ZERO,
            paused_at: None,
            stopped_at: None,
            state: TimerState::Running,
            interval_failed: false,
            warnings,
        }
    }

    fn restart(&mut self, now: Instant) {
        *self = Self::started(self.interval, self.warnings, now);
    }

    /// Fold an ongoing pause into the accumulated total.
    fn close_pause(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total = self
                .paused_total
                .saturating_add(now.saturating_duration_since(paused_at));
        }
    }

    fn pause_time(&self, now: Instant) -> Duration {
        match self.paused_at {
            Some(paused_at) => self
                .paused_total
                .saturating_add(now.saturating_duration_since(paused_at)),
            None => self.paused_total,
        }
    }

    fn total_time(&self, now: Instant) -> Duration {
        self.stopped_at
            .unwrap_or(now)
            .saturating_duration_since(self.start_time)
    }

    fn elapsed_time(&self, now: Instant) -> Duration {
        self.total_time(now).saturating_sub(self.pause_time(now))
    }
}

/// `instant + interval`, saturating at `instant` if not representable.
fn later(instant: Instant, interval: Duration) -> Instant {
    instant.checked_add(interval).unwrap_or(instant)
}

/// Cancellable, re-configurable timer for loops of constant duration.
///
/// Share it between a worker thread calling [`checkpoint`](Self::checkpoint)
/// and any number of control threads through an `Arc`.
///
/// # Example
///
/// ```
/// use cadence_timer::Timer;
/// use std::time::{Duration, Instant};
///
/// # fn main() -> Result<(), cadence_timer::TimerError> {
/// let timer = Timer::new(0.01, "sampler", false)?;
/// let start = Instant::now();
/// for _ in 0..5 {
///     // loop body
///     timer.checkpoint();
/// }
/// assert!(start.elapsed() >= Duration::from_millis(45));
/// timer.stop();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Timer {
    name: String,
    schedule: Mutex<Schedule>,
    /// Raised to cut a checkpoint wait short.
    bypass: PrecisionEvent,
    /// Raised when a paused timer may proceed.
    unpause: PrecisionEvent,
}

impl Timer {
    /// Create a running timer.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidInterval`](crate::TimerError::InvalidInterval)
    /// if `interval_secs` is negative, not finite or too large.
    pub fn new(interval_secs: f64, name: impl Into<String>, warnings: bool) -> TimerResult<Self> {
        let interval = interval_from_secs(interval_secs)?;
        Ok(Self::started(interval, name.into(), warnings, DEFAULT_SPIN_THRESHOLD))
    }

    /// Create a running timer from a configuration.
    ///
    /// The configured spin threshold is applied to both internal events; zero
    /// leaves wake accuracy to the native timed wait.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_config(config: TimerConfig) -> TimerResult<Self> {
        config.validate()?;
        Ok(Self::started(
            config.interval,
            config.name,
            config.warnings,
            config.spin_threshold,
        ))
    }

    fn started(interval: Duration, name: String, warnings: bool, spin_threshold: Duration) -> Self {
        let timer = Self {
            name,
            schedule: Mutex::new(Schedule::started(interval, warnings, Instant::now())),
            bypass: PrecisionEvent::with_spin_threshold(spin_threshold),
            unpause: PrecisionEvent::with_spin_threshold(spin_threshold),
        };
        tracing::debug!(timer = %timer.name, interval_s = interval.as_secs_f64(), "timer started");
        timer
    }

    /// Descriptive name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slice before each target that is busy-polled rather than slept.
    pub fn spin_threshold(&self) -> Duration {
        self.bypass.spin_threshold()
    }

    /// Whether overrun warnings are logged.
    pub fn warnings(&self) -> bool {
        self.schedule.lock().warnings
    }

    /// Enable or disable overrun warnings.
    pub fn set_warnings(&self, enabled: bool) {
        self.schedule.lock().warnings = enabled;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TimerState {
        self.schedule.lock().state
    }

    /// Whether the timer is stopped.
    pub fn is_stopped(&self) -> bool {
        self.state() == TimerState::Stopped
    }

    /// Whether the timer is paused.
    pub fn is_paused(&self) -> bool {
        self.state() == TimerState::Paused
    }

    /// Current interval.
    pub fn interval(&self) -> Duration {
        self.schedule.lock().interval
    }

    /// Current interval in seconds.
    pub fn interval_secs(&self) -> f64 {
        self.interval().as_secs_f64()
    }

    /// Absolute instant of the next scheduled release.
    pub fn target(&self) -> Instant {
        self.schedule.lock().target
    }

    /// Change the interval, given in seconds.
    ///
    /// With [`IntervalChange::Immediate`] the next target becomes
    /// `now + interval` and a checkpoint currently waiting returns at once.
    /// With [`IntervalChange::Deferred`] only the stored value changes; the
    /// next checkpoint schedules with it. A stopped timer ignores valid
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidInterval`](crate::TimerError::InvalidInterval)
    /// for negative, non-finite or oversized values, leaving the timer
    /// untouched.
    pub fn set_interval(&self, seconds: f64, change: IntervalChange) -> TimerResult {
        let interval = interval_from_secs(seconds).inspect_err(|err| {
            tracing::warn!(timer = %self.name, error = %err, "interval change rejected");
        })?;
        self.apply_interval(interval, change);
        Ok(())
    }

    /// Change the interval, given as a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::InvalidInterval`](crate::TimerError::InvalidInterval)
    /// if `interval` exceeds [`MAX_INTERVAL`](crate::MAX_INTERVAL).
    pub fn set_interval_duration(&self, interval: Duration, change: IntervalChange) -> TimerResult {
        let interval = check_interval(interval)?;
        self.apply_interval(interval, change);
        Ok(())
    }

    fn apply_interval(&self, interval: Duration, change: IntervalChange) {
        let mut schedule = self.schedule.lock();
        if schedule.state == TimerState::Stopped {
            return;
        }

        schedule.interval = interval;
        if change == IntervalChange::Immediate {
            schedule.target = later(Instant::now(), interval);
            self.bypass.set();
        }
        tracing::debug!(
            timer = %self.name,
            interval_s = interval.as_secs_f64(),
            ?change,
            "interval changed"
        );
    }

    /// Restart timing from now.
    ///
    /// Zeroes elapsed and paused time, schedules the next target one interval
    /// away and interrupts any wait in progress. Reactivates a stopped timer.
    pub fn reset(&self) {
        let mut schedule = self.schedule.lock();
        self.restart(&mut schedule);
    }

    /// [`reset`](Self::reset) unless the timer has been stopped.
    ///
    /// Returns whether the reset happened. The check and the reset are done
    /// under one lock, so a concurrent [`stop`](Self::stop) is never undone.
    pub fn reset_if_active(&self) -> bool {
        let mut schedule = self.schedule.lock();
        if schedule.state == TimerState::Stopped {
            return false;
        }

        self.restart(&mut schedule);
        true
    }

    fn restart(&self, schedule: &mut Schedule) {
        schedule.restart(Instant::now());
        self.unpause.set();
        self.bypass.set();
        tracing::debug!(timer = %self.name, "timer reset");
    }

    /// Stop the timer. Idempotent.
    ///
    /// Closes pause accounting, releases a paused checkpoint and interrupts a
    /// waiting one. The worker observes the stop on its next state check.
    pub fn stop(&self) {
        let mut schedule = self.schedule.lock();
        if schedule.state == TimerState::Stopped {
            return;
        }

        let now = Instant::now();
        schedule.close_pause(now);
        schedule.stopped_at = Some(now);
        schedule.state = TimerState::Stopped;
        self.unpause.set();
        self.bypass.set();
        tracing::debug!(timer = %self.name, "timer stopped");
    }

    /// Pause the timer until [`resume`](Self::resume).
    ///
    /// No-op unless running. A waiting checkpoint returns at once; the next
    /// one blocks until resumed.
    pub fn pause(&self) {
        let mut schedule = self.schedule.lock();
        if schedule.state != TimerState::Running {
            return;
        }

        self.bypass.set();
        self.unpause.clear();
        schedule.paused_at = Some(Instant::now());
        schedule.state = TimerState::Paused;
        tracing::debug!(timer = %self.name, "timer paused");
    }

    /// Resume a paused timer. No-op unless paused.
    pub fn resume(&self) {
        let mut schedule = self.schedule.lock();
        if schedule.state != TimerState::Paused {
            return;
        }

        schedule.close_pause(Instant::now());
        schedule.state = TimerState::Running;
        self.unpause.set();
        tracing::debug!(timer = %self.name, "timer resumed");
    }

    /// Wait at the current point of a loop to keep its period constant.
    ///
    /// Only this method blocks. See the module documentation for the
    /// scheduling rules.
    pub fn checkpoint(&self) -> CheckpointOutcome {
        loop {
            let schedule = self.schedule.lock();
            let state = schedule.state;
            match state {
                TimerState::Stopped => {
                    self.bypass.clear();
                    return CheckpointOutcome::Stopped;
                }
                TimerState::Running => return self.checkpoint_running(schedule),
                TimerState::Paused => {
                    drop(schedule);
                    self.unpause.wait(None);

                    let mut schedule = self.schedule.lock();
                    if schedule.state == TimerState::Running {
                        // The paused span is not charged to the schedule.
                        schedule.target = later(Instant::now(), schedule.interval);
                        self.bypass.clear();
                        return CheckpointOutcome::Resumed;
                    }
                    // Stopped: reported on the next pass. Paused again: wait again.
                }
            }
        }
    }

    fn checkpoint_running(&self, mut schedule: MutexGuard<'_, Schedule>) -> CheckpointOutcome {
        // Bypass requests made before this point are already reflected in
        // the schedule.
        self.bypass.clear();
        let now = Instant::now();

        if schedule.interval.is_zero() {
            schedule.target = now;
            schedule.interval_failed = false;
            return CheckpointOutcome::Passthrough;
        }

        if now < schedule.target {
            if schedule.interval_failed && schedule.warnings {
                tracing::info!(
                    timer = %self.name,
                    interval_s = schedule.interval.as_secs_f64(),
                    "time interval OK again"
                );
            }
            schedule.interval_failed = false;

            let deadline = schedule.target;
            schedule.target = later(deadline, schedule.interval);
            drop(schedule);

            let interrupted = self.bypass.wait_until(deadline);
            self.bypass.clear();

            if interrupted {
                CheckpointOutcome::Interrupted
            } else {
                CheckpointOutcome::OnTime {
                    waited: Instant::now().saturating_duration_since(now),
                }
            }
        } else {
            if !schedule.interval_failed && schedule.warnings {
                tracing::warn!(
                    timer = %self.name,
                    interval_s = schedule.interval.as_secs_f64(),
                    "time interval too short"
                );
            }
            schedule.interval_failed = true;

            let late = now.saturating_duration_since(schedule.target);
            schedule.target = later(now, schedule.interval);
            CheckpointOutcome::Overrun { late }
        }
    }

    /// Accumulated paused time since the last reset, including an ongoing
    /// pause.
    pub fn pause_time(&self) -> Duration {
        self.schedule.lock().pause_time(Instant::now())
    }

    /// Time since the last reset, up to the stop instant if stopped.
    pub fn total_time(&self) -> Duration {
        self.schedule.lock().total_time(Instant::now())
    }

    /// Time since the last reset, excluding paused time.
    pub fn elapsed_time(&self) -> Duration {
        self.schedule.lock().elapsed_time(Instant::now())
    }

    /// Whether the current target has already been reached.
    pub fn interval_exceeded(&self) -> bool {
        Instant::now() >= self.schedule.lock().target
    }

    /// Read every derived quantity under one lock.
    pub fn snapshot(&self) -> TimerSnapshot {
        let schedule = self.schedule.lock();
        let now = Instant::now();
        TimerSnapshot {
            state: schedule.state,
            interval: schedule.interval,
            elapsed: schedule.elapsed_time(now),
            paused: schedule.pause_time(now),
            total: schedule.total_time(now),
            until_target: schedule
                .target
                .checked_duration_since(now)
                .unwrap_or_else(|| now.saturating_duration_since(schedule.target)),
            target_passed: now >= schedule.target,
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        let config = TimerConfig::default();
        Self::started(
            config.interval,
            config.name,
            config.warnings,
            config.spin_threshold,
        )
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schedule = self.schedule.lock();
        write!(
            f,
            "Timer '{}', interval {}s, warnings {}",
            self.name,
            schedule.interval.as_secs_f64(),
            if schedule.warnings { "ON" } else { "OFF" }
        )
    }
}
