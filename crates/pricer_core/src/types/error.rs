//! Interpolator errors.

use thiserror::Error;

/// Errors of the one-dimensional interpolators behind pillar curves.
///
/// # Examples
/// ```
/// use pricer_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query outside the first and last knot.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// Query point
        x: f64,
        /// First knot
        min: f64,
        /// Last knot
        max: f64,
    },

    /// Fewer knots than the method needs.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Knots supplied
        got: usize,
        /// Knots required
        need: usize,
    },

    /// Knots are not strictly increasing.
    #[error("Knots are not strictly increasing at index {index}")]
    NonIncreasingKnots {
        /// Index of the first offending knot
        index: usize,
    },

    /// Knot and value slices of different lengths.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_display() {
        let err = InterpolationError::OutOfBounds {
            x: 5.0,
            min: 0.0,
            max: 3.0,
        };
        assert_eq!(
            err.to_string(),
            "Query point 5 outside valid domain [0, 3]"
        );
    }

    #[test]
    fn test_non_increasing_display() {
        let err = InterpolationError::NonIncreasingKnots { index: 2 };
        assert!(err.to_string().contains("index 2"));
    }
}
