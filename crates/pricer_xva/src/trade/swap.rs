//! Single-curve fixed/floating interest rate swap.

use pricer_core::market_data::curves::YieldCurve;
use pricer_models::models::rates::DATE_TOLERANCE;
use pricer_models::SimulationError;

use super::Trade;
use crate::error::ExposureError;
use crate::model_map::ModelMap;

/// Accrual period of a swap leg, paid at its end date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccrualPeriod {
    start: f64,
    end: f64,
}

impl AccrualPeriod {
    /// Create a period accruing from `start` to `end` (years).
    ///
    /// # Errors
    ///
    /// `Simulation(InvalidForwardPeriod)` unless `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> Result<Self, ExposureError> {
        if !(start >= 0.0 && end > start && end.is_finite()) {
            return Err(SimulationError::InvalidForwardPeriod { start, end }.into());
        }
        Ok(Self { start, end })
    }

    /// Periods of length `tenor` covering `[0, maturity]`, with a short stub
    /// first when `tenor` does not divide `maturity`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::trade::AccrualPeriod;
    ///
    /// let periods = AccrualPeriod::regular_strip(1.5, 1.0).unwrap();
    /// assert_eq!(periods.len(), 2);
    /// assert_eq!(periods[0].end(), 0.5);
    /// assert_eq!(periods[1].year_fraction(), 1.0);
    /// ```
    pub fn regular_strip(maturity: f64, tenor: f64) -> Result<Vec<Self>, ExposureError> {
        if !(maturity.is_finite() && maturity > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "maturity",
                value: maturity,
            }
            .into());
        }
        if !(tenor.is_finite() && tenor > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "tenor",
                value: tenor,
            }
            .into());
        }

        let count = (maturity / tenor - DATE_TOLERANCE).ceil().max(1.0) as usize;
        let mut periods = Vec::with_capacity(count);
        for k in (0..count).rev() {
            let end = maturity - k as f64 * tenor;
            let start = (end - tenor).max(0.0);
            periods.push(Self::new(start, end)?);
        }
        Ok(periods)
    }

    /// Accrual start.
    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Accrual end and payment date.
    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Accrual fraction `end - start`.
    #[inline]
    pub fn year_fraction(&self) -> f64 {
        self.end - self.start
    }
}

/// Which side of the fixed leg the holder is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    /// Pay fixed, receive floating
    Payer,
    /// Receive fixed, pay floating
    Receiver,
}

/// Fixed against floating swap projected and discounted on one rate factor.
///
/// At simulation date `t` only periods paying after `t` count. A floating
/// period that started before `t` is projected from `t` to its end and
/// accrues over its full year fraction.
///
/// The already accrued part `[s_j, t]` therefore earns the forward for
/// `[t, e_j]` instead of its historical fixing. No fixings are stored, so
/// this is an approximation for mid-period dates.
///
/// ```text
/// fixed = sum N K tau_j P(t, e_j)
/// float = sum N (F(t; s_j, e_j) + spread) tau_j P(t, e_j)
/// MTM   = fixed - float   (receiver)
/// ```
#[derive(Clone, Debug)]
pub struct InterestRateSwap {
    curve: String,
    direction: SwapDirection,
    fixed_rate: f64,
    spread: f64,
    notional: f64,
    fixed_periods: Vec<AccrualPeriod>,
    float_periods: Vec<AccrualPeriod>,
    simulation_date: f64,
}

impl InterestRateSwap {
    /// Create a swap from explicit leg schedules.
    ///
    /// # Errors
    ///
    /// `Simulation(InvalidSchedule)` when either leg has no period.
    pub fn new(
        curve: impl Into<String>,
        direction: SwapDirection,
        fixed_rate: f64,
        notional: f64,
        fixed_periods: Vec<AccrualPeriod>,
        float_periods: Vec<AccrualPeriod>,
    ) -> Result<Self, ExposureError> {
        if fixed_periods.is_empty() || float_periods.is_empty() {
            return Err(
                SimulationError::InvalidSchedule("swap leg without periods".to_string()).into(),
            );
        }
        Ok(Self {
            curve: curve.into(),
            direction,
            fixed_rate,
            spread: 0.0,
            notional,
            fixed_periods,
            float_periods,
            simulation_date: 0.0,
        })
    }

    /// Swap with both legs on a regular strip of `tenor` up to `maturity`.
    pub fn vanilla(
        curve: impl Into<String>,
        direction: SwapDirection,
        fixed_rate: f64,
        notional: f64,
        maturity: f64,
        tenor: f64,
    ) -> Result<Self, ExposureError> {
        let periods = AccrualPeriod::regular_strip(maturity, tenor)?;
        Self::new(curve, direction, fixed_rate, notional, periods.clone(), periods)
    }

    /// Add a spread over the floating rate.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Fixed coupon rate.
    #[inline]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Payer or receiver.
    #[inline]
    pub fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Fixed rate that prices the swap at zero on `curve` at valuation.
    pub fn par_rate<C: YieldCurve<f64>>(&self, curve: &C) -> Result<f64, ExposureError> {
        let df = |t: f64| curve.discount_factor(t).map_err(SimulationError::from);

        let mut annuity = 0.0;
        for p in &self.fixed_periods {
            annuity += self.notional * p.year_fraction() * df(p.end)?;
        }
        let mut float = 0.0;
        for p in &self.float_periods {
            let (ps, pe) = (df(p.start)?, df(p.end)?);
            float += self.notional * (ps - pe + self.spread * p.year_fraction() * pe);
        }
        Ok(float / annuity)
    }

    fn is_live(&self, period: &AccrualPeriod) -> bool {
        period.end > self.simulation_date + DATE_TOLERANCE
    }
}

impl Trade for InterestRateSwap {
    fn set_simulation_date(&mut self, date: f64) {
        self.simulation_date = date;
    }

    fn compute_mtm(&self, models: &ModelMap) -> Result<Vec<f64>, ExposureError> {
        let n_paths = models.n_paths();
        if self.maturity() <= self.simulation_date + DATE_TOLERANCE {
            return Ok(vec![0.0; n_paths]);
        }

        let curve = models.simulated_curve(&self.curve)?;
        let t0 = curve.current_date()?;

        let mut fixed = vec![0.0; n_paths];
        for period in self.fixed_periods.iter().filter(|p| self.is_live(p)) {
            let coupon = self.notional * self.fixed_rate * period.year_fraction();
            let df = curve.discount_factors(period.end)?;
            for (v, d) in fixed.iter_mut().zip(&df) {
                *v += coupon * d;
            }
        }

        let mut float = vec![0.0; n_paths];
        for period in self.float_periods.iter().filter(|p| self.is_live(p)) {
            let scale = self.notional * period.year_fraction();
            let df = curve.discount_factors(period.end)?;
            let fwd = curve.forward_rates(period.start.max(t0), period.end)?;
            for ((v, d), f) in float.iter_mut().zip(&df).zip(&fwd) {
                *v += scale * (f + self.spread) * d;
            }
        }

        let sign = match self.direction {
            SwapDirection::Receiver => 1.0,
            SwapDirection::Payer => -1.0,
        };
        Ok(fixed
            .iter()
            .zip(&float)
            .map(|(x, y)| sign * (x - y))
            .collect())
    }

    fn numeraire_key(&self) -> Option<&str> {
        Some(self.curve.as_str())
    }

    fn maturity(&self) -> f64 {
        self.fixed_periods
            .iter()
            .chain(&self.float_periods)
            .map(AccrualPeriod::end)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::CurveEnum;
    use pricer_models::models::rates::HullWhiteParams;
    use pricer_models::rng::{PricerRng, ShockGenerator};
    use pricer_models::schedules::SimulationDates;

    const RATE: f64 = 0.02;

    fn deterministic_map(dates: Vec<f64>) -> ModelMap {
        let dates = SimulationDates::new(dates).unwrap();
        let params = HullWhiteParams::new(0.1, 0.0).unwrap();
        ModelMap::new(dates, 3)
            .unwrap()
            .with_rate_factor("USD", CurveEnum::flat(RATE), params)
            .unwrap()
    }

    fn step(map: &mut ModelMap, shocks: &mut ShockGenerator) {
        shocks.draw();
        map.advance_slice(shocks).unwrap();
    }

    #[test]
    fn test_regular_strip_with_stub() {
        let periods = AccrualPeriod::regular_strip(2.5, 1.0).unwrap();
        let bounds: Vec<(f64, f64)> = periods.iter().map(|p| (p.start(), p.end())).collect();
        assert_eq!(bounds, vec![(0.0, 0.5), (0.5, 1.5), (1.5, 2.5)]);

        let quarterly = AccrualPeriod::regular_strip(1.0, 0.25).unwrap();
        assert_eq!(quarterly.len(), 4);
        assert_relative_eq!(quarterly[0].start(), 0.0);
    }

    #[test]
    fn test_invalid_periods() {
        assert!(AccrualPeriod::new(1.0, 1.0).is_err());
        assert!(AccrualPeriod::new(-0.5, 1.0).is_err());
        assert!(AccrualPeriod::regular_strip(0.0, 0.25).is_err());
        assert!(AccrualPeriod::regular_strip(1.0, 0.0).is_err());
        assert!(InterestRateSwap::new("USD", SwapDirection::Payer, 0.01, 1.0, vec![], vec![]).is_err());
    }

    #[test]
    fn test_single_period_values() {
        let mut map = deterministic_map(vec![0.0]);
        let mut shocks = ShockGenerator::single(PricerRng::from_seed(1), 3);
        step(&mut map, &mut shocks);

        let swap =
            InterestRateSwap::vanilla("USD", SwapDirection::Receiver, 0.03, 100.0, 1.0, 1.0).unwrap();
        let p1 = (-RATE).exp();
        let expected = 100.0 * 0.03 * p1 - 100.0 * (1.0 - p1);
        for mtm in swap.compute_mtm(&map).unwrap() {
            assert_relative_eq!(mtm, expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_par_swap_is_worth_zero() {
        let mut map = deterministic_map(vec![0.0]);
        let mut shocks = ShockGenerator::single(PricerRng::from_seed(1), 3);
        step(&mut map, &mut shocks);

        let curve = CurveEnum::flat(RATE);
        let template =
            InterestRateSwap::vanilla("USD", SwapDirection::Payer, 0.0, 1e6, 10.0, 0.25).unwrap();
        let par = template.par_rate(&curve).unwrap();
        let swap =
            InterestRateSwap::vanilla("USD", SwapDirection::Payer, par, 1e6, 10.0, 0.25).unwrap();

        for mtm in swap.compute_mtm(&map).unwrap() {
            assert!(mtm.abs() < 1e-6, "par swap MTM {mtm}");
        }
    }

    #[test]
    fn test_payer_is_negative_receiver() {
        let mut map = deterministic_map(vec![0.0]);
        let mut shocks = ShockGenerator::single(PricerRng::from_seed(1), 3);
        step(&mut map, &mut shocks);

        let payer =
            InterestRateSwap::vanilla("USD", SwapDirection::Payer, 0.025, 1.0, 5.0, 0.5).unwrap();
        let receiver =
            InterestRateSwap::vanilla("USD", SwapDirection::Receiver, 0.025, 1.0, 5.0, 0.5).unwrap();
        for (p, r) in payer
            .compute_mtm(&map)
            .unwrap()
            .iter()
            .zip(receiver.compute_mtm(&map).unwrap())
        {
            assert_relative_eq!(*p, -r, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_accruing_period_projected_from_current_date() {
        let mut map = deterministic_map(vec![0.0, 0.5]);
        let mut shocks = ShockGenerator::single(PricerRng::from_seed(1), 3);
        step(&mut map, &mut shocks);
        map.move_to_next_slice();
        step(&mut map, &mut shocks);

        let mut swap =
            InterestRateSwap::vanilla("USD", SwapDirection::Payer, 0.0, 1.0, 1.0, 1.0).unwrap();
        swap.set_simulation_date(0.5);

        let expected = 2.0 * (1.0 - (-0.5 * RATE).exp());
        for mtm in swap.compute_mtm(&map).unwrap() {
            assert_relative_eq!(mtm, expected, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_paid_periods_dropped_and_zero_after_maturity() {
        let mut map = deterministic_map(vec![0.0, 1.0, 2.0]);
        let mut shocks = ShockGenerator::single(PricerRng::from_seed(1), 3);
        step(&mut map, &mut shocks);
        map.move_to_next_slice();
        step(&mut map, &mut shocks);

        // Only the second period is live at t = 1.
        let mut swap =
            InterestRateSwap::vanilla("USD", SwapDirection::Receiver, 0.05, 1.0, 2.0, 1.0).unwrap();
        swap.set_simulation_date(1.0);
        let p = (-RATE).exp();
        let expected = 0.05 * p - (1.0 - p);
        for mtm in swap.compute_mtm(&map).unwrap() {
            assert_relative_eq!(mtm, expected, max_relative = 1e-10);
        }

        map.move_to_next_slice();
        step(&mut map, &mut shocks);
        swap.set_simulation_date(2.0);
        assert_eq!(swap.compute_mtm(&map).unwrap(), vec![0.0; 3]);
        assert_eq!(swap.maturity(), 2.0);
        assert_eq!(swap.numeraire_key(), Some("USD"));
    }
}
