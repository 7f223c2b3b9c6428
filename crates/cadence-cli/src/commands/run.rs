//! Interactive timed loop

use anyhow::{Context, Result};
use cadence_timer::{InteractiveLoop, Timer};
use std::io::{self, BufReader, Write};
use std::sync::Arc;

use super::TimerArgs;
use crate::config::load_config;
use crate::error::CliError;

/// Run a loop printing one line per tick, steered by commands on stdin.
pub fn execute(args: &TimerArgs, ticks: Option<u64>) -> Result<()> {
    let config = load_config(args.config.as_deref(), &args.overrides())?;
    let timer = Arc::new(Timer::with_config(config).map_err(CliError::from)?);
    tracing::info!(%timer, "starting interactive loop");

    let control = Arc::clone(&timer);
    let mut count = 0u64;
    let action = move || {
        count = count.saturating_add(1);
        let elapsed = control.elapsed_time().as_secs_f64();
        let mut out = io::stdout().lock();
        if let Err(err) = writeln!(out, "[{elapsed:.3}] tick {count}") {
            tracing::warn!(error = %err, "failed to write tick");
        }
        if ticks.is_some_and(|limit| count >= limit) {
            control.stop();
        }
    };

    let stats = InteractiveLoop::new(Arc::clone(&timer), action)
        .run(BufReader::new(io::stdin()), io::stdout())
        .context("Control loop failed")?;

    tracing::info!(
        iterations = stats.iterations,
        overruns = stats.overruns,
        elapsed_s = timer.elapsed_time().as_secs_f64(),
        "interactive loop finished"
    );
    Ok(())
}
