//! Pillar-based yield curve.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{Interpolator, LinearInterpolator};
use num_traits::Float;

/// Interpolation method for yield curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CurveInterpolation {
    /// Linear interpolation on zero rates; `D(t) = exp(-r(t) t)`.
    Linear,

    /// Linear interpolation on `ln D(t)`, i.e. piecewise constant forwards.
    #[default]
    LogLinear,
}

/// Yield curve built from (tenor, zero rate) pillars.
///
/// Outside the pillar range the curve either extrapolates the boundary zero
/// rate flat or reports `OutOfBounds`. Between time 0 and the first pillar the
/// first pillar's zero rate applies under flat extrapolation, so `D(0) = 1`
/// always holds.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, InterpolatedCurve, CurveInterpolation};
///
/// let curve = InterpolatedCurve::new(
///     &[0.5_f64, 1.0, 2.0, 5.0],
///     &[0.020, 0.025, 0.030, 0.035],
///     CurveInterpolation::LogLinear,
///     true,
/// ).unwrap();
///
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// assert!((curve.zero_rate(2.0).unwrap() - 0.030).abs() < 1e-12);
/// assert_eq!(curve.short_rate().unwrap(), 0.020);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedCurve<T: Float> {
    rates: Vec<T>,
    /// Interpolates zero rates or log discount factors depending on `method`.
    interp: LinearInterpolator<T>,
    method: CurveInterpolation,
    allow_extrapolation: bool,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Construct a curve from pillar tenors (years) and zero rates.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - fewer than 2 pillars, or mismatched lengths
    /// * `InvalidMaturity` - a non-positive or non-increasing tenor
    pub fn new(
        tenors: &[T],
        rates: &[T],
        method: CurveInterpolation,
        allow_extrapolation: bool,
    ) -> Result<Self, MarketDataError> {
        if tenors.len() < 2 {
            return Err(MarketDataError::InsufficientData {
                got: tenors.len(),
                need: 2,
            });
        }
        if tenors.len() != rates.len() {
            return Err(MarketDataError::InsufficientData {
                got: rates.len(),
                need: tenors.len(),
            });
        }
        for (i, &t) in tenors.iter().enumerate() {
            if t <= T::zero() || (i > 0 && t <= tenors[i - 1]) {
                return Err(MarketDataError::InvalidMaturity {
                    t: t.to_f64().unwrap_or(0.0),
                });
            }
        }

        let ys: Vec<T> = match method {
            CurveInterpolation::Linear => rates.to_vec(),
            CurveInterpolation::LogLinear => tenors
                .iter()
                .zip(rates)
                .map(|(&t, &r)| -r * t)
                .collect(),
        };
        let interp = LinearInterpolator::new(tenors, &ys)?;

        Ok(Self {
            rates: rates.to_vec(),
            interp,
            method,
            allow_extrapolation,
        })
    }

    /// Pillar tenors.
    #[inline]
    pub fn tenors(&self) -> &[T] {
        self.interp.xs()
    }

    /// Pillar zero rates.
    #[inline]
    pub fn rates(&self) -> &[T] {
        &self.rates
    }

    /// Return the tenor domain `(t_min, t_max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        self.interp.domain()
    }

    /// Return the interpolation method.
    #[inline]
    pub fn method(&self) -> CurveInterpolation {
        self.method
    }

    /// Return whether flat extrapolation is allowed.
    #[inline]
    pub fn allow_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    /// Boundary zero rate for `t` outside the pillar range.
    fn extrapolated_rate(&self, t: T) -> Result<T, MarketDataError> {
        let (t_min, t_max) = self.domain();
        if !self.allow_extrapolation {
            return Err(MarketDataError::OutOfBounds {
                x: t.to_f64().unwrap_or(0.0),
                min: t_min.to_f64().unwrap_or(0.0),
                max: t_max.to_f64().unwrap_or(0.0),
            });
        }
        if t < t_min {
            Ok(self.rates[0])
        } else {
            Ok(self.rates[self.rates.len() - 1])
        }
    }
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        if t == T::zero() {
            return Ok(T::one());
        }

        let (t_min, t_max) = self.domain();
        if t < t_min || t > t_max {
            let rate = self.extrapolated_rate(t)?;
            return Ok((-rate * t).exp());
        }

        let y = self.interp.interpolate(t)?;
        match self.method {
            CurveInterpolation::Linear => Ok((-y * t).exp()),
            CurveInterpolation::LogLinear => Ok(y.exp()),
        }
    }

    /// The first pillar's zero rate, which is the flat short-end extension
    /// of the curve.
    fn short_rate(&self) -> Result<T, MarketDataError> {
        self.extrapolated_rate(T::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample(method: CurveInterpolation, extrapolate: bool) -> InterpolatedCurve<f64> {
        InterpolatedCurve::new(
            &[1.0, 2.0, 5.0],
            &[0.01, 0.02, 0.03],
            method,
            extrapolate,
        )
        .unwrap()
    }

    #[test]
    fn test_reproduces_pillars() {
        for method in [CurveInterpolation::Linear, CurveInterpolation::LogLinear] {
            let curve = sample(method, false);
            assert_relative_eq!(curve.zero_rate(1.0).unwrap(), 0.01, epsilon = 1e-12);
            assert_relative_eq!(curve.zero_rate(2.0).unwrap(), 0.02, epsilon = 1e-12);
            assert_relative_eq!(curve.zero_rate(5.0).unwrap(), 0.03, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linear_interpolates_zero_rate() {
        let curve = sample(CurveInterpolation::Linear, false);
        assert_relative_eq!(curve.zero_rate(1.5).unwrap(), 0.015, epsilon = 1e-12);
    }

    #[test]
    fn test_log_linear_has_constant_forward_between_pillars() {
        let curve = sample(CurveInterpolation::LogLinear, false);
        let f1 = curve.forward_rate(2.0, 3.0).unwrap();
        let f2 = curve.forward_rate(3.5, 5.0).unwrap();
        assert_relative_eq!(f1, f2, epsilon = 1e-12);
        // (0.03 * 5 - 0.02 * 2) / 3
        assert_relative_eq!(f1, 0.11 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_discount_factor_at_zero_is_one() {
        let curve = sample(CurveInterpolation::Linear, false);
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_extrapolation() {
        let flat = sample(CurveInterpolation::Linear, true);
        assert_relative_eq!(flat.zero_rate(0.5).unwrap(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(flat.zero_rate(10.0).unwrap(), 0.03, epsilon = 1e-12);
        assert_eq!(flat.short_rate().unwrap(), 0.01);

        let strict = sample(CurveInterpolation::Linear, false);
        assert!(matches!(
            strict.discount_factor(10.0),
            Err(MarketDataError::OutOfBounds { .. })
        ));
        assert!(strict.short_rate().is_err());
    }

    #[test]
    fn test_invalid_construction() {
        assert!(matches!(
            InterpolatedCurve::new(&[1.0], &[0.01], CurveInterpolation::Linear, true),
            Err(MarketDataError::InsufficientData { got: 1, need: 2 })
        ));
        assert!(matches!(
            InterpolatedCurve::new(&[1.0, 2.0], &[0.01], CurveInterpolation::Linear, true),
            Err(MarketDataError::InsufficientData { .. })
        ));
        assert!(matches!(
            InterpolatedCurve::new(&[0.0, 2.0], &[0.01, 0.02], CurveInterpolation::Linear, true),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
        assert!(matches!(
            InterpolatedCurve::new(&[2.0, 1.0], &[0.01, 0.02], CurveInterpolation::Linear, true),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }
}
