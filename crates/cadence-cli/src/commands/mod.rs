//! Command implementations for cadencectl

pub mod countdown;
pub mod perf;
pub mod run;

use clap::Args;
use std::path::PathBuf;

use crate::config::Overrides;

/// Timer options shared by the commands that build a timer.
#[derive(Args, Debug, Clone, Default)]
pub struct TimerArgs {
    /// YAML timer configuration file
    #[arg(short, long, env = "CADENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Interval in seconds (overrides the file)
    #[arg(short, long)]
    pub interval: Option<f64>,

    /// Timer name (overrides the file)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Warn when the loop body does not fit in the interval
    #[arg(short, long)]
    pub warnings: bool,
}

impl TimerArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            interval: self.interval,
            name: self.name.clone(),
            warnings: self.warnings,
        }
    }
}
