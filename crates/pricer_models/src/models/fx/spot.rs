//! Lognormal FX spot factor.

use crate::error::SimulationError;
use crate::models::rates::HullWhiteFactor;
use crate::schedules::SimulationDates;

/// Per-path FX spot (domestic units per foreign unit) driven by the short
/// rate differential of two Hull-White factors.
///
/// Over a slice of length `dt` every path moves as
/// ```text
/// S <- S * exp((r_dom - r_for - vol^2 / 2) dt + vol sqrt(dt) z)
/// ```
/// with `r_dom`, `r_for` the per-path short rates of the two factors at the
/// current slice. Slice 0 is valuation, so the spot keeps its initial value
/// there.
///
/// The factor keeps no reference to its rate factors. They are passed to
/// [`advance`](Self::advance) and must sit on the same slice.
///
/// # Example
///
/// ```
/// use pricer_models::models::fx::SimulatedFxSpot;
/// use pricer_models::models::rates::{HullWhiteFactor, HullWhiteParams};
/// use pricer_models::schedules::SimulationDates;
///
/// let dates = SimulationDates::new(vec![0.0, 1.0]).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.0).unwrap();
/// let dom = HullWhiteFactor::new(params, dates.clone(), 1, 0.03).unwrap();
/// let frn = HullWhiteFactor::new(params, dates.clone(), 1, 0.01).unwrap();
///
/// let mut spot = SimulatedFxSpot::new(1.25, 0.1, dates, 1).unwrap();
/// spot.advance(&dom, &frn, &[0.0]).unwrap();
/// assert_eq!(spot.spots(), &[1.25]);
/// ```
#[derive(Clone, Debug)]
pub struct SimulatedFxSpot {
    dates: SimulationDates,
    current_slice: usize,
    initial_spot: f64,
    volatility: f64,
    spots: Vec<f64>,
}

impl SimulatedFxSpot {
    /// Create a spot factor with every path at `initial_spot`.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` unless `initial_spot > 0`, `volatility >= 0`
    /// (both finite) and `n_paths > 0`.
    pub fn new(
        initial_spot: f64,
        volatility: f64,
        dates: SimulationDates,
        n_paths: usize,
    ) -> Result<Self, SimulationError> {
        if !(initial_spot.is_finite() && initial_spot > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "initial_spot",
                value: initial_spot,
            });
        }
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "fx_volatility",
                value: volatility,
            });
        }
        if n_paths == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "n_paths",
                value: 0.0,
            });
        }

        Ok(Self {
            dates,
            current_slice: 0,
            initial_spot,
            volatility,
            spots: vec![initial_spot; n_paths],
        })
    }

    /// Advance every path to the current slice.
    ///
    /// # Errors
    ///
    /// * `OutOfRange` - the pointer is past the last date
    /// * `SliceMismatch` - a rate factor is on a different slice
    /// * `PathCountMismatch` - a rate factor simulates a different path count
    /// * `ShockLengthMismatch` - `shocks.len() != n_paths`
    pub fn advance(
        &mut self,
        domestic: &HullWhiteFactor,
        foreign: &HullWhiteFactor,
        shocks: &[f64],
    ) -> Result<(), SimulationError> {
        let i = self.current_slice;
        let t_i = self.dates.get(i).ok_or(SimulationError::OutOfRange {
            slice: i,
            len: self.dates.len(),
        })?;
        let n = self.spots.len();
        for rates in [domestic, foreign] {
            if rates.current_slice() != i {
                return Err(SimulationError::SliceMismatch {
                    expected: i,
                    got: rates.current_slice(),
                });
            }
            if rates.n_paths() != n {
                return Err(SimulationError::PathCountMismatch {
                    expected: n,
                    got: rates.n_paths(),
                });
            }
        }
        if shocks.len() != n {
            return Err(SimulationError::ShockLengthMismatch {
                expected: n,
                got: shocks.len(),
            });
        }

        let dt = t_i - self.dates.previous(i);
        if dt <= 0.0 {
            return Ok(());
        }
        let vol = self.volatility;
        let ito = 0.5 * vol * vol * dt;
        let diffusion = vol * dt.sqrt();

        for (((s, &rd), &rf), &z) in self
            .spots
            .iter_mut()
            .zip(domestic.short_rates())
            .zip(foreign.short_rates())
            .zip(shocks)
        {
            *s *= ((rd - rf) * dt - ito + diffusion * z).exp();
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

    /// Per-path spot values at the current slice.
    #[inline]
    pub fn spots(&self) -> &[f64] {
        &self.spots
    }

    /// Spot every path started from.
    #[inline]
    pub fn initial_spot(&self) -> f64 {
        self.initial_spot
    }

    /// Lognormal spot volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.spots.len()
    }

    /// Simulation schedule.
    #[inline]
    pub fn dates(&self) -> &SimulationDates {
        &self.dates
    }
}
