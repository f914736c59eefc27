//! Hull-White one-factor short-rate simulation factor.
//!
//! The short rate follows
//! ```text
//! dr(t) = [theta(t) - a * r(t)] * dt + sigma * dW(t)
//! ```
//! with theta(t) fitted to the base curve. Writing `r(t) = x(t) + beta(t)`,
//! where `x` is an Ornstein-Uhlenbeck process started at zero and
//! ```text
//! beta(t) = f(0, t) + (sigma * (1 - exp(-a t)) / (sqrt(2) a))^2
//! ```
//! the transition between two simulation dates is exact:
//! ```text
//! r_i = r_{i-1} d + beta_i - beta_{i-1} d + s z,   d = exp(-a dt),
//! s = sigma * sqrt((1 - exp(-2 a dt)) / (2 a))
//! ```
//! so the factor can step over arbitrarily wide slices without
//! discretisation bias.
//!
//! ## Usage
//!
//! ```
//! use pricer_models::models::rates::{HullWhiteFactor, HullWhiteParams};
//! use pricer_models::schedules::SimulationDates;
//! use pricer_core::market_data::curves::FlatCurve;
//!
//! let params = HullWhiteParams::new(0.1, 0.01).unwrap();
//! let dates = SimulationDates::new(vec![0.0, 1.0, 2.0]).unwrap();
//! let mut factor = HullWhiteFactor::from_curve(params, dates, 4, &FlatCurve::new(0.02)).unwrap();
//!
//! // Slice 0 only records beta; rates stay at r(0)
//! factor.advance(0.02, &[0.0; 4]).unwrap();
//! assert_eq!(factor.short_rates(), &[0.02; 4]);
//! assert_eq!(factor.numeraire(), &[1.0; 4]);
//! factor.move_to_next_slice();
//!
//! factor.advance(0.02, &[1.0, -1.0, 0.0, 0.5]).unwrap();
//! assert!(factor.short_rates()[0] > factor.short_rates()[1]);
//! ```

use pricer_core::market_data::curves::YieldCurve;

use crate::error::SimulationError;
use crate::schedules::SimulationDates;

/// Hull-White model parameters.
///
/// # Fields
///
/// * `mean_reversion` - Mean reversion speed `a`, strictly positive
/// * `volatility` - Short rate volatility `sigma`, non-negative
///
/// Zero volatility is allowed and makes the factor deterministic, which is
/// how martingale checks pin the factor to its base curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HullWhiteParams {
    mean_reversion: f64,
    volatility: f64,
}

impl HullWhiteParams {
    /// Create new Hull-White parameters with validation.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidParameter` if `mean_reversion <= 0`,
    /// `volatility < 0`, or either is non-finite.
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_models::models::rates::HullWhiteParams;
    ///
    /// assert!(HullWhiteParams::new(0.05, 0.01).is_ok());
    /// assert!(HullWhiteParams::new(0.05, 0.0).is_ok());
    /// assert!(HullWhiteParams::new(-0.05, 0.01).is_err());
    /// assert!(HullWhiteParams::new(0.05, -0.01).is_err());
    /// ```
    pub fn new(mean_reversion: f64, volatility: f64) -> Result<Self, SimulationError> {
        if !(mean_reversion.is_finite() && mean_reversion > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "mean_reversion",
                value: mean_reversion,
            });
        }
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "volatility",
                value: volatility,
            });
        }
        Ok(Self {
            mean_reversion,
            volatility,
        })
    }

    /// Mean reversion speed `a`.
    #[inline]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Short rate volatility `sigma`.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Bond price sensitivity `B(tau) = (1 - exp(-a tau)) / a`.
    #[inline]
    pub fn bond_sensitivity(&self, tau: f64) -> f64 {
        let a = self.mean_reversion;
        (1.0 - (-a * tau).exp()) / a
    }

    /// Convexity part of `beta(t)`: `(sigma (1 - exp(-a t)) / (sqrt(2) a))^2`.
    #[inline]
    pub fn convexity(&self, t: f64) -> f64 {
        let a = self.mean_reversion;
        let x = self.volatility * (1.0 - (-a * t).exp()) / (std::f64::consts::SQRT_2 * a);
        x * x
    }

    /// Standard deviation of the short rate over a step of length `dt`.
    #[inline]
    pub fn step_std_dev(&self, dt: f64) -> f64 {
        let a = self.mean_reversion;
        self.volatility * ((1.0 - (-2.0 * a * dt).exp()) / (2.0 * a)).sqrt()
    }
}

/// Per-path Hull-White short-rate state over a fixed simulation schedule.
///
/// The factor owns its short rates, running numeraire and the `beta`
/// history; callers only ever see `&[f64]` snapshots. A factor is built for
/// one run and walks the schedule exactly once.
///
/// # Slice protocol
///
/// For each slice: [`advance`](Self::advance) once, read state, then
/// [`move_to_next_slice`](Self::move_to_next_slice). `advance` never moves the
/// pointer itself; once the pointer reaches `dates.len()` every further
/// `advance` fails with `OutOfRange`.
#[derive(Clone, Debug)]
pub struct HullWhiteFactor {
    params: HullWhiteParams,
    dates: SimulationDates,
    current_slice: usize,
    initial_short_rate: f64,
    short_rates: Vec<f64>,
    numeraire: Vec<f64>,
    beta: Vec<f64>,
}

impl HullWhiteFactor {
    /// Create a factor with every path at `initial_short_rate` and a unit
    /// numeraire.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for zero paths or a non-finite initial rate.
    pub fn new(
        params: HullWhiteParams,
        dates: SimulationDates,
        n_paths: usize,
        initial_short_rate: f64,
    ) -> Result<Self, SimulationError> {
        if n_paths == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "n_paths",
                value: 0.0,
            });
        }
        if !initial_short_rate.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "initial_short_rate",
                value: initial_short_rate,
            });
        }

        let beta = vec![0.0; dates.len()];
        Ok(Self {
            params,
            dates,
            current_slice: 0,
            initial_short_rate,
            short_rates: vec![initial_short_rate; n_paths],
            numeraire: vec![1.0; n_paths],
            beta,
        })
    }

    /// Create a factor seeded with the short end of `curve`.
    pub fn from_curve<C: YieldCurve<f64>>(
        params: HullWhiteParams,
        dates: SimulationDates,
        n_paths: usize,
        curve: &C,
    ) -> Result<Self, SimulationError> {
        let r0 = curve.short_rate()?;
        Self::new(params, dates, n_paths, r0)
    }

    /// Advance every path to the current slice.
    ///
    /// `forward_rate` is the deterministic base-curve forward for the
    /// current slice and `shocks` holds one standard normal per path.
    ///
    /// At slice 0 only `beta[0]` is recorded: the short rate starts
    /// deterministically at `r(0)` and the numeraire at 1.
    ///
    /// # Errors
    ///
    /// * `OutOfRange` - the pointer is past the last date
    /// * `ShockLengthMismatch` - `shocks.len() != n_paths`
    pub fn advance(&mut self, forward_rate: f64, shocks: &[f64]) -> Result<(), SimulationError> {
        let i = self.current_slice;
        let t_i = self.dates.get(i).ok_or(SimulationError::OutOfRange {
            slice: i,
            len: self.dates.len(),
        })?;
        if shocks.len() != self.short_rates.len() {
            return Err(SimulationError::ShockLengthMismatch {
                expected: self.short_rates.len(),
                got: shocks.len(),
            });
        }

        self.beta[i] = forward_rate + self.params.convexity(t_i);
        if i == 0 {
            return Ok(());
        }

        let dt = t_i - self.dates[i - 1];
        let decay = (-self.params.mean_reversion * dt).exp();
        let std_dev = self.params.step_std_dev(dt);
        let drift = self.beta[i] - self.beta[i - 1] * decay;

        for ((r, num), &z) in self
            .short_rates
            .iter_mut()
            .zip(self.numeraire.iter_mut())
            .zip(shocks)
        {
            *r = *r * decay + drift + std_dev * z;
            *num *= (-*r * dt).exp();
        }

        Ok(())
    }

    /// Move the slice pointer forward by one.
    #[inline]
    pub fn move_to_next_slice(&mut self) {
        self.current_slice += 1;
    }

    /// Index of the current slice.
    #[inline]
    pub fn current_slice(&self) -> usize {
        self.current_slice
    }

    /// Date of the current slice, `None` once the schedule is exhausted.
    #[inline]
    pub fn current_date(&self) -> Option<f64> {
        self.dates.get(self.current_slice)
    }

    /// Date of the slice before the current one (valuation at slice 0).
    #[inline]
    pub fn previous_date(&self) -> f64 {
        self.dates.previous(self.current_slice)
    }

    /// Per-path short rates at the current slice.
    #[inline]
    pub fn short_rates(&self) -> &[f64] {
        &self.short_rates
    }

    /// Per-path running numeraire `exp(-sum r dt)` up to the current slice.
    #[inline]
    pub fn numeraire(&self) -> &[f64] {
        &self.numeraire
    }

    /// Deterministic `beta` values recorded so far, aligned to the schedule.
    #[inline]
    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    /// Short rate `r(0)` every path started from.
    #[inline]
    pub fn initial_short_rate(&self) -> f64 {
        self.initial_short_rate
    }

    /// Model parameters.
    #[inline]
    pub fn params(&self) -> &HullWhiteParams {
        &self.params
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.short_rates.len()
    }

    /// Simulation schedule.
    #[inline]
    pub fn dates(&self) -> &SimulationDates {
        &self.dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::FlatCurve;
    use proptest::prelude::*;

    fn factor(sigma: f64, dates: Vec<f64>, n_paths: usize) -> HullWhiteFactor {
        let params = HullWhiteParams::new(0.1, sigma).unwrap();
        let dates = SimulationDates::new(dates).unwrap();
        HullWhiteFactor::from_curve(params, dates, n_paths, &FlatCurve::new(0.01)).unwrap()
    }

    #[test]
    fn test_params_validation() {
        assert!(HullWhiteParams::new(0.0, 0.01).is_err());
        assert!(HullWhiteParams::new(f64::NAN, 0.01).is_err());
        assert!(HullWhiteParams::new(0.1, f64::INFINITY).is_err());
        assert_eq!(
            HullWhiteParams::new(0.1, -0.01),
            Err(SimulationError::InvalidParameter {
                name: "volatility",
                value: -0.01
            })
        );
    }

    #[test]
    fn test_params_helpers() {
        let p = HullWhiteParams::new(0.1, 0.01).unwrap();
        assert_relative_eq!(p.bond_sensitivity(1.0), (1.0 - (-0.1_f64).exp()) / 0.1);
        assert_eq!(p.convexity(0.0), 0.0);
        assert_relative_eq!(
            p.step_std_dev(1.0),
            0.01 * ((1.0 - (-0.2_f64).exp()) / 0.2).sqrt()
        );
    }

    #[test]
    fn test_initial_state() {
        let f = factor(0.01, vec![0.0, 1.0], 3);
        assert_eq!(f.current_slice(), 0);
        assert_eq!(f.short_rates(), &[0.01; 3]);
        assert_eq!(f.numeraire(), &[1.0; 3]);
        assert_eq!(f.initial_short_rate(), 0.01);
        assert_eq!(f.n_paths(), 3);
    }

    #[test]
    fn test_zero_paths_rejected() {
        let params = HullWhiteParams::new(0.1, 0.01).unwrap();
        let dates = SimulationDates::new(vec![0.0]).unwrap();
        assert!(matches!(
            HullWhiteFactor::new(params, dates, 0, 0.01),
            Err(SimulationError::InvalidParameter { name: "n_paths", .. })
        ));
    }

    #[test]
    fn test_slice_zero_only_sets_beta() {
        let mut f = factor(0.02, vec![0.0, 1.0], 2);
        f.advance(0.01, &[3.0, -3.0]).unwrap();
        assert_eq!(f.beta()[0], 0.01);
        assert_eq!(f.short_rates(), &[0.01, 0.01]);
        assert_eq!(f.numeraire(), &[1.0, 1.0]);
        assert_eq!(f.current_slice(), 0);
    }

    #[test]
    fn test_exact_transition() {
        let mut f = factor(0.01, vec![0.0, 2.0], 1);
        f.advance(0.01, &[0.0]).unwrap();
        f.move_to_next_slice();
        f.advance(0.012, &[1.5]).unwrap();

        let p = f.params();
        let d = (-0.1_f64 * 2.0).exp();
        let beta1 = 0.012 + p.convexity(2.0);
        let expected = 0.01 * d + beta1 - 0.01 * d + p.step_std_dev(2.0) * 1.5;
        assert_relative_eq!(f.short_rates()[0], expected, epsilon = 1e-15);
        assert_relative_eq!(f.numeraire()[0], (-expected * 2.0).exp(), epsilon = 1e-15);
    }

    #[test]
    fn test_zero_volatility_numeraire_matches_curve() {
        let curve = FlatCurve::new(0.01);
        let dates = [0.0, 1.0, 2.0, 5.0, 10.0];
        let mut f = factor(0.0, dates.to_vec(), 2);
        for i in 0..dates.len() {
            let fwd = if i == 0 {
                curve.short_rate().unwrap()
            } else {
                curve.forward_rate(dates[i - 1], dates[i]).unwrap()
            };
            f.advance(fwd, &[0.7, -0.7]).unwrap();
            for &num in f.numeraire() {
                assert_relative_eq!(
                    num,
                    curve.discount_factor(dates[i]).unwrap(),
                    max_relative = 1e-12
                );
            }
            f.move_to_next_slice();
        }
    }

    #[test]
    fn test_advance_past_end_fails() {
        let mut f = factor(0.01, vec![0.0, 1.0], 1);
        f.move_to_next_slice();
        f.move_to_next_slice();
        assert_eq!(f.current_date(), None);
        assert_eq!(
            f.advance(0.01, &[0.0]),
            Err(SimulationError::OutOfRange { slice: 2, len: 2 })
        );
    }

    #[test]
    fn test_shock_length_mismatch() {
        let mut f = factor(0.01, vec![0.0, 1.0], 3);
        assert_eq!(
            f.advance(0.01, &[0.0; 2]),
            Err(SimulationError::ShockLengthMismatch {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn test_previous_date() {
        let mut f = factor(0.01, vec![0.5, 1.0], 1);
        assert_eq!(f.previous_date(), 0.0);
        f.move_to_next_slice();
        assert_eq!(f.previous_date(), 0.5);
        assert_eq!(f.current_date(), Some(1.0));
    }

    proptest! {
        #[test]
        fn prop_slice_counter_tracks_moves(len in 1usize..20, moves in 0usize..20) {
            let moves = moves.min(len);
            let dates: Vec<f64> = (0..len).map(|i| i as f64 * 0.5).collect();
            let mut f = factor(0.01, dates, 2);
            for _ in 0..moves {
                f.advance(0.01, &[0.0, 0.0]).unwrap();
                f.move_to_next_slice();
            }
            prop_assert_eq!(f.current_slice(), moves);
            if moves == len {
                let out_of_range = matches!(
                    f.advance(0.01, &[0.0, 0.0]),
                    Err(SimulationError::OutOfRange { .. })
                );
                prop_assert!(out_of_range);
            } else {
                prop_assert!(f.advance(0.01, &[0.0, 0.0]).is_ok());
            }
        }
    }
}
