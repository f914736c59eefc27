//! Errors raised by base curve construction and queries.

use crate::types::InterpolationError;
use thiserror::Error;

/// Base curve errors.
///
/// Curves are immutable once built, so every variant reports either a bad
/// constructor input or a query outside what the curve supports.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Curve queried or built at a negative, non-finite or non-increasing
    /// time.
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// Offending time in years
        t: f64,
    },

    /// Maturity beyond the pillar range of a curve built without
    /// extrapolation.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// Queried maturity
        x: f64,
        /// First pillar
        min: f64,
        /// Last pillar
        max: f64,
    },

    /// Failure inside the pillar interpolator.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Too few pillars, or tenors and rates of different lengths.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Pillars (or rates) supplied
        got: usize,
        /// Pillars required
        need: usize,
    },
}
