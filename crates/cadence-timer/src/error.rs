//! Error types for the timer crate.
//!
//! Only the interval setters (and the configuration that feeds them) can fail.
//! Overruns are reported through logging and [`CheckpointOutcome`], never as
//! errors.
//!
//! [`CheckpointOutcome`]: crate::timer::CheckpointOutcome

use thiserror::Error;

/// Errors raised by timer construction and interval mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    /// The requested interval is negative, not finite or too large.
    ///
    /// Timer state is left untouched when this is returned.
    #[error("Invalid interval: {value}s ({reason})")]
    InvalidInterval {
        /// The rejected value in seconds.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration value other than the interval is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl TimerError {
    /// Create an invalid interval error.
    #[must_use]
    pub fn invalid_interval(value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidInterval {
            value,
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }
}

/// A specialized `Result` type for timer operations.
pub type TimerResult<T = ()> = std::result::Result<T, TimerError>;

/// Errors raised while parsing `"h:m:s"` duration strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    /// The input does not have exactly three `:`-separated components.
    #[error("'{0}' is not a valid duration of the form h:m:s")]
    InvalidFormat(String),

    /// One component is neither empty nor a number.
    #[error("'{value}' is not a valid value for {unit}")]
    InvalidComponent {
        /// `hours`, `minutes` or `seconds`.
        unit: &'static str,
        /// The offending text.
        value: String,
    },

    /// The components add up to a negative duration.
    #[error("'{0}' adds up to a negative duration")]
    Negative(String),

    /// The components add up to a duration that cannot be represented.
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}
