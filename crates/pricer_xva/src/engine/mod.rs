//! Monte Carlo exposure engine.
//!
//! The engine walks the schedule of a [`ModelMap`] one slice at a time:
//! draw shocks, advance every factor in ordinal order, revalue the trade,
//! record its (discounted) MTM as one row of the [`ExposureMatrix`], then
//! move every factor to the next slice.

mod config;

pub use config::{EngineConfig, EngineConfigBuilder, DEFAULT_SEED};

use pricer_models::models::hybrid::{CorrelationError, CorrelationMatrix};
use pricer_models::rng::{PricerRng, ShockGenerator};
use tracing::{debug, info, warn};

use crate::error::ExposureError;
use crate::model_map::ModelMap;
use crate::soa::ExposureMatrix;
use crate::trade::Trade;

/// Path-wise exposure simulator.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::curves::CurveEnum;
/// use pricer_models::models::rates::HullWhiteParams;
/// use pricer_models::schedules::SimulationDates;
/// use pricer_xva::engine::{EngineConfig, ExposureEngine};
/// use pricer_xva::model_map::ModelMap;
/// use pricer_xva::trade::{InterestRateSwap, SwapDirection};
///
/// let dates = SimulationDates::uniform(0.0, 0.25, 21).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
/// let mut models = ModelMap::new(dates, 500)
///     .unwrap()
///     .with_rate_factor("USD", CurveEnum::flat(0.02), params)
///     .unwrap();
///
/// let mut swap =
///     InterestRateSwap::vanilla("USD", SwapDirection::Payer, 0.02, 1e6, 5.0, 0.25).unwrap();
///
/// let engine = ExposureEngine::new(EngineConfig::builder().seed(1).build());
/// let matrix = engine.run(&mut swap, &mut models, None).unwrap();
///
/// assert_eq!(matrix.n_dates(), 21);
/// assert_eq!(matrix.n_paths(), 500);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExposureEngine {
    config: EngineConfig,
}

impl ExposureEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration.
    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Simulate `trade` over every date of `models`.
    ///
    /// `correlation` is the row-major correlation of the factor shocks in
    /// ordinal order; it is required when the map holds more than one
    /// factor. Every check runs before any factor state changes, so a
    /// rejected call leaves `models` untouched.
    ///
    /// # Errors
    ///
    /// * `EmptyModelMap` - no factor registered
    /// * `StaleModelMap` - a factor already moved past slice 0
    /// * `InvalidCorrelation` - correlation missing, malformed or not PSD
    /// * `MissingDependency` - an FX factor lacks its rate factors
    /// * `UnknownFactor` / `NotARateFactor` - the trade's numeraire factor
    /// * `MtmLengthMismatch` - the trade returned the wrong number of values
    /// * `Simulation` - any factor or curve error during the run
    pub fn run<T: Trade + ?Sized>(
        &self,
        trade: &mut T,
        models: &mut ModelMap,
        correlation: Option<&[f64]>,
    ) -> Result<ExposureMatrix, ExposureError> {
        let mut shocks = self.prepare(trade, models, correlation)?;

        let dates = models.dates().clone();
        let n_paths = models.n_paths();
        let numeraire_key = if self.config.discounted() {
            let key = trade.numeraire_key().map(str::to_owned);
            if key.is_none() {
                warn!("Discounting requested but the trade declares no numeraire; MTM left undiscounted");
            }
            key
        } else {
            None
        };

        info!(
            n_paths,
            n_dates = dates.len(),
            n_factors = models.len(),
            seed = self.config.seed(),
            numeraire = numeraire_key.as_deref().unwrap_or("none"),
            "Starting exposure simulation"
        );

        let mut matrix = ExposureMatrix::new(dates.to_vec(), n_paths);
        for (i, &t) in dates.iter().enumerate() {
            shocks.draw();
            models.advance_slice(&shocks)?;

            trade.set_simulation_date(t);
            let mtm = trade.compute_mtm(models)?;
            if mtm.len() != n_paths {
                return Err(ExposureError::MtmLengthMismatch {
                    expected: n_paths,
                    got: mtm.len(),
                });
            }

            let row = matrix.row_mut(i);
            match numeraire_key.as_deref() {
                Some(key) => {
                    let numeraire = models.numeraire(key)?;
                    for ((x, v), n) in row.iter_mut().zip(&mtm).zip(numeraire) {
                        *x = v * n;
                    }
                }
                None => row.copy_from_slice(&mtm),
            }
            debug!(slice = i, date = t, "Slice simulated");

            models.move_to_next_slice();
        }

        info!(n_dates = dates.len(), "Exposure simulation complete");
        Ok(matrix)
    }

    /// Validate the inputs of a run and build its shock generator.
    fn prepare<T: Trade + ?Sized>(
        &self,
        trade: &T,
        models: &ModelMap,
        correlation: Option<&[f64]>,
    ) -> Result<ShockGenerator, ExposureError> {
        if models.is_empty() {
            return Err(ExposureError::EmptyModelMap);
        }
        models.validate_fresh()?;

        let n_factors = models.len();
        let correlation = match correlation {
            Some(data) => Some(CorrelationMatrix::new(data, n_factors)?),
            None if n_factors > 1 => {
                return Err(CorrelationError::Missing { factors: n_factors }.into())
            }
            None => None,
        };

        let rng = PricerRng::from_seed(self.config.seed());
        let shocks = match correlation {
            Some(matrix) if n_factors > 1 => {
                ShockGenerator::correlated(rng, models.n_paths(), matrix.cholesky()?)
            }
            _ => ShockGenerator::single(rng, models.n_paths()),
        };

        models.validate_dependencies()?;
        if self.config.discounted() {
            if let Some(key) = trade.numeraire_key() {
                models.numeraire(key)?;
            }
        }
        Ok(shocks)
    }
}
