//! Timer configuration.
//!
//! Intervals are stored as [`Duration`] and serialized as a floating point
//! number of seconds under the `interval_s` key, e.g. in YAML:
//!
//! ```yaml
//! interval_s: 0.25
//! name: sampler
//! warnings: true
//! spin_threshold_s: 0.0002
//! ```

use crate::error::{TimerError, TimerResult};
use crate::interval::{check_interval, interval_from_secs};
use cadence_event::DEFAULT_SPIN_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration used to construct a [`Timer`](crate::Timer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Nominal time between checkpoints.
    #[serde(rename = "interval_s", with = "interval_secs")]
    pub interval: Duration,
    /// Descriptive name used in log messages.
    pub name: String,
    /// Log a warning when the interval is too short for the loop body.
    pub warnings: bool,
    /// Slice before each target that is busy-polled. Zero disables the spin
    /// tail and relies on the native timed wait alone.
    #[serde(rename = "spin_threshold_s", with = "interval_secs")]
    pub spin_threshold: Duration,
}

/// Largest accepted spin threshold.
pub const MAX_SPIN_THRESHOLD: Duration = Duration::from_secs(1);

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            name: "Timer".to_string(),
            warnings: false,
            spin_threshold: DEFAULT_SPIN_THRESHOLD,
        }
    }
}

impl TimerConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is out of range, the name is blank
    /// or the spin threshold exceeds [`MAX_SPIN_THRESHOLD`].
    pub fn validate(&self) -> TimerResult {
        check_interval(self.interval)?;
        if self.name.trim().is_empty() {
            return Err(TimerError::invalid_configuration("name must not be blank"));
        }
        if self.spin_threshold > MAX_SPIN_THRESHOLD {
            return Err(TimerError::invalid_configuration(format!(
                "spin threshold {}s exceeds maximum of {}s",
                self.spin_threshold.as_secs_f64(),
                MAX_SPIN_THRESHOLD.as_secs()
            )));
        }
        Ok(())
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::default()
    }
}

/// Builder for `TimerConfig`.
#[derive(Debug, Default)]
pub struct TimerConfigBuilder {
    config: TimerConfig,
    interval_secs: Option<f64>,
}

impl TimerConfigBuilder {
    /// Set the interval.
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self.interval_secs = None;
        self
    }

    /// Set the interval in seconds. Validated by [`build`](Self::build).
    #[must_use]
    pub fn interval_secs(mut self, seconds: f64) -> Self {
        self.interval_secs = Some(seconds);
        self
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Enable or disable overrun warnings.
    #[must_use]
    pub fn warnings(mut self, enabled: bool) -> Self {
        self.config.warnings = enabled;
        self
    }

    /// Set the spin threshold of the timer's waits.
    #[must_use]
    pub fn spin_threshold(mut self, threshold: Duration) -> Self {
        self.config.spin_threshold = threshold;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(mut self) -> TimerResult<TimerConfig> {
        if let Some(seconds) = self.interval_secs {
            self.config.interval = interval_from_secs(seconds)?;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

mod interval_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        crate::interval::interval_from_secs(seconds).map_err(serde::de::Error::custom)
    }
}
