//! Terminal countdown

use anyhow::{Context, Result};
use cadence_timer::Timer;
use cadence_timer::countdown::{Countdown, CountdownStatus, spawn_clock};
use std::io;
use std::sync::Arc;

use crate::error::CliError;
use crate::output;

/// Shortest accepted refresh interval in seconds.
pub const MIN_REFRESH_SECS: f64 = 0.01;

fn check_refresh(refresh: f64) -> Result<(), CliError> {
    if refresh.is_finite() && refresh >= MIN_REFRESH_SECS {
        Ok(())
    } else {
        Err(CliError::InvalidConfiguration(format!(
            "refresh must be at least {MIN_REFRESH_SECS}s, got {refresh}"
        )))
    }
}

/// Count down from an `h:m:s` duration, redrawing once per `refresh`.
pub fn execute(duration: &str, refresh: f64, exit_when_done: bool) -> Result<()> {
    check_refresh(refresh)?;
    let countdown = Countdown::parse(duration).map_err(CliError::from)?;
    let timer = Arc::new(Timer::new(refresh, "countdown", false).map_err(CliError::from)?);
    tracing::debug!(total_s = countdown.total().as_secs_f64(), "countdown started");

    let (clock, receiver) =
        spawn_clock(Arc::clone(&timer), countdown).context("Failed to start countdown clock")?;

    let mut out = io::stdout();
    output::print_countdown(&mut out, countdown.status(timer.elapsed_time()))?;

    for status in &receiver {
        output::print_countdown(&mut out, status)?;
        if exit_when_done && status == CountdownStatus::Finished {
            timer.stop();
            break;
        }
    }
    println!();

    timer.stop();
    drop(receiver);
    if clock.join().is_err() {
        return Err(io::Error::other("countdown clock panicked").into());
    }
    Ok(())
}
