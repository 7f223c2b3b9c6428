//! Loop cadence measurement

use anyhow::Result;
use cadence_timer::perf::performance_test;
use std::time::Duration;

use crate::error::CliError;
use crate::output;

/// Measure how closely a loop with random body durations holds `interval`.
pub fn execute(
    interval: f64,
    loops: usize,
    max_fraction: f64,
    warnings: bool,
    precise: bool,
    json: bool,
) -> Result<()> {
    let report =
        performance_test(interval, loops, max_fraction, warnings, precise).map_err(CliError::from)?;
    let requested = Duration::try_from_secs_f64(interval).unwrap_or(Duration::ZERO);
    output::print_performance(&report, requested, json)
}
