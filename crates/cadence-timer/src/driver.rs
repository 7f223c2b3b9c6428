//! Loop drivers: call an action once per interval until the timer stops.

use crate::control::Controller;
use crate::timer::{CheckpointOutcome, Timer};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::thread;

/// Counters collected while driving a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    /// Number of times the action ran.
    pub iterations: u64,
    /// Checkpoints that found the target already passed.
    pub overruns: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: CheckpointOutcome) {
        if matches!(outcome, CheckpointOutcome::Overrun { .. }) {
            self.overruns = self.overruns.saturating_add(1);
        }
    }
}

/// Runs an action, then a checkpoint, until the timer is stopped.
#[derive(Debug)]
pub struct TimedLoop<F> {
    timer: Arc<Timer>,
    action: F,
}

impl<F> TimedLoop<F> {
    /// Create a loop around `timer`.
    pub fn new(timer: Arc<Timer>, action: F) -> Self {
        Self { timer, action }
    }

    /// The timer pacing the loop.
    pub fn timer(&self) -> &Arc<Timer> {
        &self.timer
    }
}

impl<F: FnMut()> TimedLoop<F> {
    /// Drive the loop until the timer is stopped.
    ///
    /// The stop is observed after the checkpoint that follows the action, so
    /// a stop issued while the action runs lets it finish once.
    pub fn run(mut self) -> LoopStats {
        let mut stats = LoopStats::default();
        while !self.timer.is_stopped() {
            (self.action)();
            stats.iterations = stats.iterations.saturating_add(1);
            stats.record(self.timer.checkpoint());
        }
        tracing::debug!(
            timer = %self.timer.name(),
            iterations = stats.iterations,
            overruns = stats.overruns,
            "loop finished"
        );
        stats
    }
}

impl<F, E> TimedLoop<F>
where
    F: FnMut() -> Result<(), E>,
{
    /// Drive a fallible action until the timer is stopped or the action fails.
    ///
    /// # Errors
    ///
    /// Returns the action's first error; the timer is stopped first.
    pub fn try_run(mut self) -> Result<LoopStats, E> {
        let mut stats = LoopStats::default();
        while !self.timer.is_stopped() {
            if let Err(err) = (self.action)() {
                self.timer.stop();
                return Err(err);
            }
            stats.iterations = stats.iterations.saturating_add(1);
            stats.record(self.timer.checkpoint());
        }
        Ok(stats)
    }
}

/// A [`TimedLoop`] with a control thread reading commands concurrently.
#[derive(Debug)]
pub struct InteractiveLoop<F> {
    inner: TimedLoop<F>,
}

impl<F: FnMut()> InteractiveLoop<F> {
    /// Create an interactive loop around `timer`.
    pub fn new(timer: Arc<Timer>, action: F) -> Self {
        Self {
            inner: TimedLoop::new(timer, action),
        }
    }

    /// Start the control thread on `input`/`output`, then drive the loop.
    ///
    /// The timer is reset once the control thread is running so its start-up
    /// is not charged to the first interval, unless a command has already
    /// stopped it. The control thread exits when the timer stops or its input
    /// ends (which stops the timer). A control thread still blocked on input
    /// after the loop ends is detached.
    ///
    /// # Errors
    ///
    /// Returns an error if the control thread cannot be spawned or failed
    /// with an I/O error.
    pub fn run<R, W>(self, input: R, output: W) -> io::Result<LoopStats>
    where
        R: BufRead + Send + 'static,
        W: Write + Send + 'static,
    {
        let timer = Arc::clone(&self.inner.timer);
        let controller = Controller::new(Arc::clone(&timer), output);
        let control = thread::Builder::new()
            .name("cadence-control".to_string())
            .spawn(move || controller.serve(input).map(drop))?;

        timer.reset_if_active();
        let stats = self.inner.run();

        if control.is_finished() {
            match control.join() {
                Ok(result) => result?,
                Err(_) => {
                    return Err(io::Error::other("control thread panicked"));
                }
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimerResult;
    use std::time::{Duration, Instant};

    #[test]
    fn test_loop_runs_until_stopped() -> TimerResult {
        let timer = Arc::new(Timer::new(0.005, "t", false)?);
        let handle = Arc::clone(&timer);
        let mut count = 0u32;

        let stats = TimedLoop::new(timer, move || {
            count += 1;
            if count == 5 {
                handle.stop();
            }
        })
        .run();

        assert_eq!(stats.iterations, 5);
        Ok(())
    }

    #[test]
    fn test_stopped_timer_never_runs_action() -> TimerResult {
        let timer = Arc::new(Timer::new(0.005, "t", false)?);
        timer.stop();
        let stats = TimedLoop::new(timer, || {}).run();
        assert_eq!(stats, LoopStats::default());
        Ok(())
    }

    #[test]
    fn test_try_run_stops_on_error() -> TimerResult {
        let timer = Arc::new(Timer::new(0.005, "t", false)?);
        let mut count = 0u32;

        let result = TimedLoop::new(Arc::clone(&timer), || {
            count += 1;
            if count == 3 { Err("boom") } else { Ok(()) }
        })
        .try_run();

        assert_eq!(result, Err("boom"));
        assert!(timer.is_stopped());
        Ok(())
    }

    #[test]
    fn test_overruns_are_counted() -> TimerResult {
        let timer = Arc::new(Timer::new(0.005, "t", false)?);
        let handle = Arc::clone(&timer);
        let mut count = 0u32;

        let stats = TimedLoop::new(timer, move || {
            count += 1;
            thread::sleep(Duration::from_millis(15));
            if count == 3 {
                handle.stop();
            }
        })
        .run();

        assert_eq!(stats.iterations, 3);
        assert!(stats.overruns >= 2, "overruns: {}", stats.overruns);
        Ok(())
    }

    #[test]
    fn test_interactive_loop_stops_on_quit() -> Result<(), Box<dyn std::error::Error>> {
        let timer = Arc::new(Timer::new(0.01, "t", false)?);
        let start = Instant::now();

        InteractiveLoop::new(Arc::clone(&timer), || {}).run(io::Cursor::new("q\n"), io::sink())?;

        assert!(timer.is_stopped());
        assert!(start.elapsed() < Duration::from_secs(2));
        Ok(())
    }
}
