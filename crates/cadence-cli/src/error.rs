//! Error types for cadencectl

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(#[from] cadence_timer::DurationParseError),

    #[error("Timer error: {0}")]
    Timer(#[from] cadence_timer::TimerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidConfiguration(_) | Self::Yaml(_) => 2,
            Self::InvalidDuration(_) | Self::Timer(_) => 3,
            Self::Io(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_group_by_cause() {
        assert_eq!(CliError::InvalidConfiguration("x".into()).exit_code(), 2);
        assert_eq!(
            CliError::from(cadence_timer::TimerError::invalid_interval(-1.0, "negative"))
                .exit_code(),
            3
        );
        assert_eq!(CliError::from(std::io::Error::other("gone")).exit_code(), 4);
    }
}
