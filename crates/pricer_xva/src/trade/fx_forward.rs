//! FX forward.

use pricer_models::models::rates::DATE_TOLERANCE;

use super::Trade;
use crate::error::ExposureError;
use crate::model_map::ModelMap;

/// FX forward buying `notional` units of foreign currency for `strike`
/// domestic units each at `maturity`.
///
/// At simulation date `t`, per path:
/// ```text
/// MTM = notional * (S(t) P_for(t, T) - K P_dom(t, T))
/// ```
/// in domestic currency, and zero once `t >= T`. A negative notional sells
/// the foreign currency.
#[derive(Clone, Debug)]
pub struct FxForward {
    fx_spot: String,
    domestic: String,
    foreign: String,
    strike: f64,
    notional: f64,
    maturity: f64,
    simulation_date: f64,
}

impl FxForward {
    /// Create a forward referencing factors of a [`ModelMap`] by name.
    ///
    /// # Arguments
    ///
    /// * `fx_spot` - FX factor quoting domestic per foreign
    /// * `domestic` - domestic rate factor, also the numeraire
    /// * `foreign` - foreign rate factor
    /// * `strike` - agreed domestic price of one foreign unit
    /// * `notional` - foreign notional, signed
    /// * `maturity` - settlement date in years
    pub fn new(
        fx_spot: impl Into<String>,
        domestic: impl Into<String>,
        foreign: impl Into<String>,
        strike: f64,
        notional: f64,
        maturity: f64,
    ) -> Self {
        Self {
            fx_spot: fx_spot.into(),
            domestic: domestic.into(),
            foreign: foreign.into(),
            strike,
            notional,
            maturity,
            simulation_date: 0.0,
        }
    }

    /// Agreed exchange rate.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Signed foreign notional.
    #[inline]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Date of the last [`set_simulation_date`](Trade::set_simulation_date).
    #[inline]
    pub fn simulation_date(&self) -> f64 {
        self.simulation_date
    }
}

impl Trade for FxForward {
    fn set_simulation_date(&mut self, date: f64) {
        self.simulation_date = date;
    }

    fn compute_mtm(&self, models: &ModelMap) -> Result<Vec<f64>, ExposureError> {
        if self.maturity <= self.simulation_date + DATE_TOLERANCE {
            return Ok(vec![0.0; models.n_paths()]);
        }

        let spots = models.fx_spots(&self.fx_spot)?;
        let p_dom = models
            .simulated_curve(&self.domestic)?
            .discount_factors(self.maturity)?;
        let p_for = models
            .simulated_curve(&self.foreign)?
            .discount_factors(self.maturity)?;

        Ok(spots
            .iter()
            .zip(&p_dom)
            .zip(&p_for)
            .map(|((s, pd), pf)| self.notional * (s * pf - self.strike * pd))
            .collect())
    }

    fn numeraire_key(&self) -> Option<&str> {
        Some(self.domestic.as_str())
    }

    fn maturity(&self) -> f64 {
        self.maturity
    }
}
