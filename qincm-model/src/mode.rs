use crate::error::QincmError;
use std::fmt;
use std::str::FromStr;

/// Evaluation modes a run can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Total cost per route over a discharge scenario
    Scenario,
}

impl FromStr for Mode {
    type Err = QincmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scenario" => Ok(Mode::Scenario),
            _ => Err(QincmError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Scenario => write!(f, "scenario"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!("scenario".parse::<Mode>().unwrap(), Mode::Scenario);
        assert_eq!(" Scenario ".parse::<Mode>().unwrap(), Mode::Scenario);
        assert_eq!(
            "timeseries".parse::<Mode>().unwrap_err(),
            QincmError::UnsupportedMode("timeseries".to_string())
        );
    }
}
