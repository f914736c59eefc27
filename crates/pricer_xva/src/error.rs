//! Error types for exposure simulation.

use pricer_models::models::hybrid::CorrelationError;
use pricer_models::SimulationError;
use thiserror::Error;

/// Errors raised while assembling a model map or running the exposure engine.
///
/// Every error aborts the run. Rerunning with the same seed reproduces it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExposureError {
    /// The correlation matrix is absent, malformed or not PSD
    #[error("Invalid correlation: {0}")]
    InvalidCorrelation(#[from] CorrelationError),

    /// An FX factor references a rate factor that is not ahead of it
    #[error("Factor '{factor}' depends on a missing rate factor")]
    MissingDependency {
        /// Name of the dependent factor
        factor: String,
    },

    /// No factor is registered under the name
    #[error("Unknown factor '{0}'")]
    UnknownFactor(String),

    /// A factor with the same name is already registered
    #[error("Duplicate factor '{0}'")]
    DuplicateFactor(String),

    /// The named factor exists but is not a short rate factor
    #[error("Factor '{0}' is not a rate factor")]
    NotARateFactor(String),

    /// The named factor exists but is not an FX spot factor
    #[error("Factor '{0}' is not an FX spot factor")]
    NotAnFxFactor(String),

    /// A factor has already been advanced by a previous run
    #[error("Factor '{factor}' is at slice {slice}; a fresh model map is required")]
    StaleModelMap {
        /// Name of the stale factor
        factor: String,
        /// Slice the factor is on
        slice: usize,
    },

    /// The trade returned a value vector of the wrong length
    #[error("Trade MTM has {got} values, expected {expected}")]
    MtmLengthMismatch {
        /// Number of simulated paths
        expected: usize,
        /// Number of values returned
        got: usize,
    },

    /// The path count is zero
    #[error("Invalid path count: {0}")]
    InvalidPathCount(usize),

    /// The model map holds no factor
    #[error("Model map is empty")]
    EmptyModelMap,

    /// Error raised by a simulation factor
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExposureError::MissingDependency {
            factor: "EURUSD".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Factor 'EURUSD' depends on a missing rate factor"
        );

        let err = ExposureError::StaleModelMap {
            factor: "USD".to_string(),
            slice: 3,
        };
        assert!(format!("{}", err).contains("slice 3"));
    }

    #[test]
    fn test_from_correlation_error() {
        let err: ExposureError = CorrelationError::Missing { factors: 3 }.into();
        assert!(matches!(
            err,
            ExposureError::InvalidCorrelation(CorrelationError::Missing { factors: 3 })
        ));
    }

    #[test]
    fn test_from_simulation_error() {
        let err: ExposureError = SimulationError::OutOfRange { slice: 5, len: 5 }.into();
        assert!(matches!(
            err,
            ExposureError::Simulation(SimulationError::OutOfRange { slice: 5, len: 5 })
        ));
    }
}
