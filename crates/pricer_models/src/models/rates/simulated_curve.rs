//! Path-conditioned discount curve.

use pricer_core::market_data::curves::YieldCurve;

use super::hull_white::HullWhiteFactor;
use crate::error::SimulationError;

/// Dates closer than this (in years) are treated as the same date.
pub const DATE_TOLERANCE: f64 = 1e-4;

/// Read-only view of a base curve conditioned on a [`HullWhiteFactor`].
///
/// The view borrows both parts and holds no state; it always reflects the
/// factor's current slice. Discount factors use the Hull-White affine bond
/// formula
/// ```text
/// P(t0, T) = A(t0, T) exp(-r B(T - t0))
/// A(t0, T) = P(0, T) / P(0, t0) * exp(B f(0, t0) - sigma^2 / (4a) (1 - exp(-2 a t0)) B^2)
/// ```
/// where `t0` is the current slice date and `f(0, t0)` the base
/// instantaneous forward at `t0`.
///
/// # Example
///
/// ```
/// use pricer_models::models::rates::{HullWhiteFactor, HullWhiteParams, SimulatedCurve};
/// use pricer_models::schedules::SimulationDates;
/// use pricer_core::market_data::curves::FlatCurve;
///
/// let curve = FlatCurve::new(0.02);
/// let dates = SimulationDates::new(vec![0.0, 1.0]).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
/// let factor = HullWhiteFactor::from_curve(params, dates, 2, &curve).unwrap();
///
/// let view = SimulatedCurve::new(&curve, &factor);
/// let df = view.discount_factors(5.0).unwrap();
/// assert!((df[0] - (-0.1_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct SimulatedCurve<'a, C: YieldCurve<f64>> {
    base: &'a C,
    factor: &'a HullWhiteFactor,
}

impl<'a, C: YieldCurve<f64>> SimulatedCurve<'a, C> {
    /// Pair a base curve with the factor driving it.
    #[inline]
    pub fn new(base: &'a C, factor: &'a HullWhiteFactor) -> Self {
        Self { base, factor }
    }

    /// Current slice date.
    ///
    /// # Errors
    ///
    /// `OutOfRange` once the factor has walked past its schedule.
    pub fn current_date(&self) -> Result<f64, SimulationError> {
        self.factor
            .current_date()
            .ok_or(SimulationError::OutOfRange {
                slice: self.factor.current_slice(),
                len: self.factor.dates().len(),
            })
    }

    /// Per-path discount factors from the current slice date to `target`.
    ///
    /// Returns exactly 1 on every path when `target` is within
    /// [`DATE_TOLERANCE`] of the current slice date.
    ///
    /// # Errors
    ///
    /// * `InvalidDate` - `target` precedes the current slice date
    /// * `OutOfRange` - the factor is past its schedule
    /// * `MarketData` - base curve lookup failed
    pub fn discount_factors(&self, target: f64) -> Result<Vec<f64>, SimulationError> {
        let t0 = self.current_date()?;
        if target < t0 - DATE_TOLERANCE {
            return Err(SimulationError::InvalidDate {
                date: target,
                slice_date: t0,
            });
        }
        if (target - t0).abs() < DATE_TOLERANCE {
            return Ok(vec![1.0; self.factor.n_paths()]);
        }

        let params = self.factor.params();
        let a = params.mean_reversion();
        let sigma = params.volatility();

        let b = params.bond_sensitivity(target - t0);
        let fwd = self.instantaneous_forward(t0)?;
        let variance = sigma * sigma / (4.0 * a) * (1.0 - (-2.0 * a * t0).exp());
        let ratio = self.base.discount_factor(target)? / self.base.discount_factor(t0)?;
        let big_a = ratio * (b * fwd - variance * b * b).exp();

        Ok(self
            .factor
            .short_rates()
            .iter()
            .map(|&r| big_a * (-r * b).exp())
            .collect())
    }

    /// Per-path simple forward rates `(P(start) / P(end) - 1) / (end - start)`.
    ///
    /// # Errors
    ///
    /// * `InvalidDate` - `start` precedes the current slice date
    /// * `InvalidForwardPeriod` - `end <= start`
    pub fn forward_rates(&self, start: f64, end: f64) -> Result<Vec<f64>, SimulationError> {
        let t0 = self.current_date()?;
        if start < t0 - DATE_TOLERANCE {
            return Err(SimulationError::InvalidDate {
                date: start,
                slice_date: t0,
            });
        }
        if end <= start {
            return Err(SimulationError::InvalidForwardPeriod { start, end });
        }

        let p_start = self.discount_factors(start)?;
        let p_end = self.discount_factors(end)?;
        let tau = end - start;
        Ok(p_start
            .iter()
            .zip(&p_end)
            .map(|(&ps, &pe)| (ps / pe - 1.0) / tau)
            .collect())
    }

    /// Base instantaneous forward at `t0`, taken as the log-derivative of the
    /// base discount factors over the slice ending at `t0`.
    fn instantaneous_forward(&self, t0: f64) -> Result<f64, SimulationError> {
        let prev = self.factor.previous_date();
        if (t0 - prev).abs() < DATE_TOLERANCE {
            return Ok(self.factor.initial_short_rate());
        }
        let ln_p0 = self.base.discount_factor(t0)?.ln();
        let ln_prev = self.base.discount_factor(prev)?.ln();
        Ok(-(ln_p0 - ln_prev) / (t0 - prev))
    }

    /// Per-path short rates at the current slice.
    #[inline]
    pub fn short_rates(&self) -> &'a [f64] {
        self.factor.short_rates()
    }

    /// Per-path running numeraire.
    #[inline]
    pub fn numeraire(&self) -> &'a [f64] {
        self.factor.numeraire()
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.factor.n_paths()
    }

    /// Deterministic base curve.
    #[inline]
    pub fn base(&self) -> &'a C {
        self.base
    }

    /// Driving factor.
    #[inline]
    pub fn factor(&self) -> &'a HullWhiteFactor {
        self.factor
    }
}
