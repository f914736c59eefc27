//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Tenor, in years, used to sample the short end of a curve that has no
/// closed form for `r(0)`.
pub const SHORT_END_TENOR: f64 = 1e-4;

/// Deterministic base discount curve.
///
/// This is the contract the simulator consumes from curve construction: today's
/// discount factors as a function of maturity, immutable for a whole run.
///
/// # Contract
///
/// - `discount_factor(t)` returns D(t) for maturity t >= 0
/// - `zero_rate(t)` returns the continuously compounded zero rate r(t)
/// - `forward_rate(t1, t2)` returns the continuously compounded forward rate
/// - `short_rate()` returns the zero rate at time 0, the seed of a short-rate model
///
/// # Invariants
///
/// - D(0) = 1
/// - D(t) > 0 for all t >= 0
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
///
/// let fwd = curve.forward_rate(1.0, 2.0).unwrap();
/// assert!((fwd - 0.05).abs() < 1e-10);
///
/// assert_eq!(curve.short_rate().unwrap(), 0.05);
/// ```
pub trait YieldCurve<T: Float> {
    /// Return the discount factor for maturity `t`.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if t < 0.
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the continuously compounded zero rate for maturity `t`.
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// r(t) = -ln(D(t)) / t
    /// ```
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if t <= 0.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = self.discount_factor(t)?;
        Ok(-df.ln() / t)
    }

    /// Return the continuously compounded forward rate between t1 and t2.
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// f(t1, t2) = -ln(D(t2) / D(t1)) / (t2 - t1)
    /// ```
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidMaturity` if t2 <= t1.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }

    /// Return the zero rate at time 0.
    ///
    /// The default samples the curve at [`SHORT_END_TENOR`]; implementations
    /// with an exact short end override it.
    fn short_rate(&self) -> Result<T, MarketDataError> {
        let tenor = T::from(SHORT_END_TENOR).ok_or(MarketDataError::InvalidMaturity {
            t: SHORT_END_TENOR,
        })?;
        self.zero_rate(tenor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only `discount_factor` is provided, exercising every default method.
    struct MockCurve {
        rate: f64,
    }

    impl YieldCurve<f64> for MockCurve {
        fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
            if t < 0.0 {
                return Err(MarketDataError::InvalidMaturity { t });
            }
            Ok((-self.rate * t).exp())
        }
    }

    #[test]
    fn test_default_zero_rate() {
        let curve = MockCurve { rate: 0.05 };
        assert!((curve.zero_rate(1.0).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_default_zero_rate_at_zero_fails() {
        let curve = MockCurve { rate: 0.05 };
        assert_eq!(
            curve.zero_rate(0.0),
            Err(MarketDataError::InvalidMaturity { t: 0.0 })
        );
    }

    #[test]
    fn test_default_forward_rate() {
        let curve = MockCurve { rate: 0.05 };
        assert!((curve.forward_rate(1.0, 2.0).unwrap() - 0.05).abs() < 1e-12);
        assert!(curve.forward_rate(2.0, 1.0).is_err());
        assert!(curve.forward_rate(1.0, 1.0).is_err());
    }

    #[test]
    fn test_default_short_rate() {
        let curve = MockCurve { rate: 0.03 };
        assert!((curve.short_rate().unwrap() - 0.03).abs() < 1e-10);
    }
}
