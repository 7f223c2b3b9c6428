//! `"h:m:s"` duration strings.

use crate::error::DurationParseError;
use std::time::Duration;

fn component(text: &str, unit: &'static str) -> Result<f64, DurationParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(value) => Ok(value),
        Err(_) => Err(DurationParseError::InvalidComponent {
            unit,
            value: text.to_string(),
        }),
    }
}

/// Parse a duration written as `h:m:s`.
///
/// Each component may be empty (zero) or a decimal number, fractional values
/// included; all three are summed, so `":1.5:30"` is two minutes.
///
/// # Errors
///
/// Returns an error if there are not exactly three components, a component is
/// not a number, or the total is negative or not representable.
///
/// # Example
///
/// ```
/// use cadence_timer::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("::5"), Ok(Duration::from_secs(5)));
/// assert_eq!(parse_duration("1:45:"), Ok(Duration::from_secs(6300)));
/// assert_eq!(parse_duration("1.75::"), Ok(Duration::from_secs(6300)));
/// assert!(parse_duration("5").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let mut parts = input.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DurationParseError::InvalidFormat(input.to_string()));
    };

    let total = component(hours, "hours")? * 3600.0
        + component(minutes, "minutes")? * 60.0
        + component(seconds, "seconds")?;

    if total.is_nan() || total.is_infinite() {
        return Err(DurationParseError::OutOfRange(input.to_string()));
    }
    if total < 0.0 {
        return Err(DurationParseError::Negative(input.to_string()));
    }
    match Duration::try_from_secs_f64(total) {
        Ok(duration) => Ok(duration),
        Err(_) => Err(DurationParseError::OutOfRange(input.to_string())),
    }
}
