//! Timer configuration loading for cadencectl

use anyhow::{Context, Result};
use cadence_timer::TimerConfig;
use std::fs;
use std::path::Path;

use crate::error::CliError;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub interval: Option<f64>,
    pub name: Option<String>,
    pub warnings: bool,
}

/// Parse a YAML timer configuration.
pub fn parse_config(text: &str) -> Result<TimerConfig, CliError> {
    let config: TimerConfig = serde_yaml::from_str(text)?;
    config
        .validate()
        .map_err(|err| CliError::InvalidConfiguration(err.to_string()))?;
    Ok(config)
}

/// Load the configuration file if given, then apply overrides.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<TimerConfig> {
    let base = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            parse_config(&text)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => TimerConfig::default(),
    };

    let mut builder = TimerConfig::builder()
        .interval(base.interval)
        .name(overrides.name.clone().unwrap_or(base.name))
        .warnings(base.warnings || overrides.warnings);
    if let Some(seconds) = overrides.interval {
        builder = builder.interval_secs(seconds);
    }

    let config = builder.build().map_err(CliError::from)?;
    tracing::debug!(
        interval_s = config.interval.as_secs_f64(),
        name = %config.name,
        warnings = config.warnings,
        "timer configuration loaded"
    );
    Ok(config)
}
