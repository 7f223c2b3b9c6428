//! Cadence accuracy harness.
//!
//! Runs a loop whose body sleeps for a random fraction of the interval and
//! records when each checkpoint releases, to check that the mean period
//! matches the requested interval.

use crate::config::TimerConfig;
use crate::error::{TimerError, TimerResult};
use crate::measure::clocked;
use crate::timer::Timer;
use rand::Rng;
use std::thread;
use std::time::{Duration, Instant};

/// Raw samples of a constant-duration loop.
#[derive(Debug, Clone, Default)]
pub struct LoopSamples {
    /// Instant after each checkpoint, preceded by the loop start.
    pub checkpoints: Vec<Instant>,
    /// Measured duration of each loop body.
    pub body_durations: Vec<Duration>,
}

impl LoopSamples {
    /// Time between consecutive checkpoint releases.
    pub fn periods(&self) -> Vec<Duration> {
        self.checkpoints
            .windows(2)
            .filter_map(|pair| match pair {
                [earlier, later] => Some(later.saturating_duration_since(*earlier)),
                _ => None,
            })
            .collect()
    }

    /// Summarize the periods.
    pub fn report(&self) -> PerformanceReport {
        let periods: Vec<f64> = self.periods().iter().map(Duration::as_secs_f64).collect();
        if periods.is_empty() {
            return PerformanceReport::default();
        }

        let Ok(count) = u32::try_from(periods.len()) else {
            return PerformanceReport::default();
        };
        let count = f64::from(count);
        let mean = periods.iter().sum::<f64>() / count;
        let variance = periods.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / count;

        PerformanceReport {
            loops: periods.len(),
            mean: Duration::try_from_secs_f64(mean).unwrap_or(Duration::ZERO),
            std_dev: Duration::try_from_secs_f64(variance.sqrt()).unwrap_or(Duration::ZERO),
        }
    }
}

/// Mean and spread of measured loop periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PerformanceReport {
    /// Number of periods measured.
    pub loops: usize,
    /// Mean period.
    pub mean: Duration,
    /// Population standard deviation of the period.
    pub std_dev: Duration,
}

impl PerformanceReport {
    /// Mean period minus `requested`, in seconds.
    pub fn mean_error_secs(&self, requested: Duration) -> f64 {
        self.mean.as_secs_f64() - requested.as_secs_f64()
    }
}

/// Run `loops` iterations whose bodies sleep up to `max_fraction` of the
/// interval, checkpointing after each.
///
/// The timer is reset first so set-up time is not measured.
///
/// # Errors
///
/// Returns [`TimerError::InvalidConfiguration`] if `max_fraction` is negative
/// or not finite.
pub fn constant_duration_loop<R: Rng>(
    timer: &Timer,
    max_fraction: f64,
    loops: usize,
    rng: &mut R,
) -> TimerResult<LoopSamples> {
    if !max_fraction.is_finite() || max_fraction < 0.0 {
        return Err(TimerError::invalid_configuration(format!(
            "max_fraction must be a non-negative number, got {max_fraction}"
        )));
    }

    let mut samples = LoopSamples {
        checkpoints: Vec::with_capacity(loops.saturating_add(1)),
        body_durations: Vec::with_capacity(loops),
    };

    timer.reset();
    samples.checkpoints.push(Instant::now());

    for _ in 0..loops {
        let fraction = max_fraction * rng.random::<f64>();
        let body = Duration::try_from_secs_f64(timer.interval_secs() * fraction)
            .unwrap_or(Duration::ZERO);

        let ((), spent) = clocked(|| thread::sleep(body));
        timer.checkpoint();

        samples.checkpoints.push(Instant::now());
        samples.body_durations.push(spent);
    }

    Ok(samples)
}

/// Measure the cadence of a fresh timer.
///
/// With `precise` off the timer waits without a spin tail, so the report
/// shows the accuracy of the native timed wait alone.
///
/// # Errors
///
/// Returns an error if the interval or `max_fraction` is invalid.
pub fn performance_test(
    interval_secs: f64,
    loops: usize,
    max_fraction: f64,
    warnings: bool,
    precise: bool,
) -> TimerResult<PerformanceReport> {
    let mut builder = TimerConfig::builder()
        .interval_secs(interval_secs)
        .name("performance")
        .warnings(warnings);
    if !precise {
        builder = builder.spin_threshold(Duration::ZERO);
    }
    let timer = Timer::with_config(builder.build()?)?;
    let samples = constant_duration_loop(&timer, max_fraction, loops, &mut rand::rng())?;
    timer.stop();

    let report = samples.report();
    tracing::info!(
        loops = report.loops,
        mean_s = report.mean.as_secs_f64(),
        std_dev_s = report.std_dev.as_secs_f64(),
        "performance test finished"
    );
    Ok(report)
}
