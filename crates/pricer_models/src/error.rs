//! Simulation error types.

use pricer_core::market_data::MarketDataError;
use thiserror::Error;

/// Errors raised while building or advancing simulation factors.
///
/// All variants are fatal for the run that raised them. A simulation is
/// deterministic given its seed, so the recovery path is a corrected rerun.
///
/// # Examples
///
/// ```
/// use pricer_models::SimulationError;
///
/// let err = SimulationError::OutOfRange { slice: 5, len: 5 };
/// assert!(err.to_string().contains("slice 5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The slice pointer has moved past the last simulation date.
    #[error("Simulation slice {slice} is out of range for a schedule of {len} dates")]
    OutOfRange {
        /// Current slice index
        slice: usize,
        /// Number of simulation dates
        len: usize,
    },

    /// A date earlier than the factor's current slice date was requested.
    #[error("Date {date} precedes the current slice date {slice_date}")]
    InvalidDate {
        /// Requested date (years)
        date: f64,
        /// Current slice date (years)
        slice_date: f64,
    },

    /// Forward period with `end <= start`.
    #[error("Invalid forward period: end {end} must be after start {start}")]
    InvalidForwardPeriod {
        /// Period start (years)
        start: f64,
        /// Period end (years)
        end: f64,
    },

    /// Shock vector length differs from the path count.
    #[error("Expected {expected} shocks, got {got}")]
    ShockLengthMismatch {
        /// Number of paths
        expected: usize,
        /// Number of shocks supplied
        got: usize,
    },

    /// Two coupled factors simulate different numbers of paths.
    #[error("Path count mismatch: expected {expected}, got {got}")]
    PathCountMismatch {
        /// Path count of the factor being advanced
        expected: usize,
        /// Path count of the dependency
        got: usize,
    },

    /// Two coupled factors are on different slices.
    #[error("Slice mismatch: factor is on slice {expected}, dependency on slice {got}")]
    SliceMismatch {
        /// Slice of the factor being advanced
        expected: usize,
        /// Slice of the dependency
        got: usize,
    },

    /// Model parameter outside its valid domain.
    #[error("Invalid parameter {name} = {value}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Simulation schedule failed validation.
    #[error("Invalid simulation schedule: {0}")]
    InvalidSchedule(String),

    /// Base curve lookup failed.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SimulationError::InvalidDate {
            date: 0.5,
            slice_date: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Date 0.5 precedes the current slice date 1"
        );

        let err = SimulationError::InvalidParameter {
            name: "mean_reversion",
            value: -0.1,
        };
        assert!(err.to_string().contains("mean_reversion"));
    }

    #[test]
    fn test_from_market_data_error() {
        let err: SimulationError = MarketDataError::InvalidMaturity { t: -1.0 }.into();
        assert!(matches!(err, SimulationError::MarketData(_)));
    }
}
