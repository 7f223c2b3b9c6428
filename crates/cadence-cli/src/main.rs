//! cadencectl - drift-free timed loops from the command line
//!
//! Runs an interactive loop at a fixed period, counts down in the terminal,
//! and measures how closely a loop with random body durations holds its
//! period.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::TimerArgs;
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "cadencectl")]
#[command(about = "Run, steer and measure drift-free timed loops")]
#[command(version)]
#[command(long_about = "
cadencectl runs loops at a constant period. The period is held against
absolute targets, so it does not drift however long each iteration takes,
as long as the iteration fits in the interval.

While `run` is active, type commands on stdin: a number changes the
interval, p/r pause and resume, R resets, t prints timing, q stops.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an interactive timed loop
    Run {
        #[command(flatten)]
        timer: TimerArgs,

        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },

    /// Count down from a duration given as h:m:s (e.g. ::30 or 1:30:)
    Countdown {
        /// Duration as h:m:s; empty components are zero
        duration: String,

        /// Display refresh interval in seconds
        #[arg(long, default_value_t = 1.0)]
        refresh: f64,

        /// Exit as soon as the countdown reaches zero
        #[arg(long)]
        exit_when_done: bool,
    },

    /// Measure the mean loop period against the requested interval
    Perf {
        /// Interval in seconds
        #[arg(short, long, default_value_t = 0.05)]
        interval: f64,

        /// Number of loops to measure
        #[arg(short, long, default_value_t = 40)]
        loops: usize,

        /// Largest loop body as a fraction of the interval
        #[arg(long, default_value_t = 0.9)]
        fmax: f64,

        /// Warn when the loop body does not fit in the interval
        #[arg(short, long)]
        warnings: bool,

        /// Wait on the native timed wait alone, without the spin tail
        #[arg(long)]
        coarse: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("cadencectl={log_level},cadence_timer={log_level},cadence_event={log_level}")
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run { timer, ticks } => commands::run::execute(timer, *ticks),
        Commands::Countdown {
            duration,
            refresh,
            exit_when_done,
        } => commands::countdown::execute(duration, *refresh, *exit_when_done),
        Commands::Perf {
            interval,
            loops,
            fmax,
            warnings,
            coarse,
        } => commands::perf::execute(*interval, *loops, *fmax, *warnings, !*coarse, cli.json),
    }
}
