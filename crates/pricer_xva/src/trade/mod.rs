//! Trades valued on simulated market states.
//!
//! A [`Trade`] prices itself against the factors of a [`ModelMap`] at the
//! current simulation date and returns one mark-to-market value per path,
//! expressed in the currency of its numeraire factor at that date.
//!
//! Reference implementations:
//! - [`FxForward`]: physically settled FX forward
//! - [`InterestRateSwap`]: fixed against floating single-curve swap

mod fx_forward;
mod swap;

pub use fx_forward::FxForward;
pub use swap::{AccrualPeriod, InterestRateSwap, SwapDirection};

use crate::error::ExposureError;
use crate::model_map::ModelMap;

/// A trade the exposure engine can revalue at every simulation date.
pub trait Trade {
    /// Set the date (years from valuation) the next valuation refers to.
    fn set_simulation_date(&mut self, date: f64);

    /// Per-path mark-to-market at the simulation date.
    ///
    /// Returns a zero vector on or after maturity.
    fn compute_mtm(&self, models: &ModelMap) -> Result<Vec<f64>, ExposureError>;

    /// Rate factor whose running numeraire discounts this trade's MTM back
    /// to valuation. `None` leaves MTM undiscounted.
    fn numeraire_key(&self) -> Option<&str> {
        None
    }

    /// Final payment date in years.
    fn maturity(&self) -> f64;
}

impl<T: Trade + ?Sized> Trade for Box<T> {
    fn set_simulation_date(&mut self, date: f64) {
        (**self).set_simulation_date(date)
    }

    fn compute_mtm(&self, models: &ModelMap) -> Result<Vec<f64>, ExposureError> {
        (**self).compute_mtm(models)
    }

    fn numeraire_key(&self) -> Option<&str> {
        (**self).numeraire_key()
    }

    fn maturity(&self) -> f64 {
        (**self).maturity()
    }
}
