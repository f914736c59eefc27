//! Scenario configuration.
//!
//! A scenario is a TOML file describing the simulation schedule, the rate
//! and FX factors, their correlation and the trade to simulate.

use std::path::Path;

use pricer_core::market_data::curves::{CurveEnum, CurveInterpolation, InterpolatedCurve};
use pricer_models::models::hybrid::CorrelationMatrix;
use pricer_models::models::rates::HullWhiteParams;
use pricer_models::schedules::SimulationDates;
use pricer_xva::engine::{EngineConfig, DEFAULT_SEED};
use pricer_xva::trade::{FxForward, InterestRateSwap, SwapDirection, Trade};
use pricer_xva::{ExposureError, ModelMap};
use serde::Deserialize;

use crate::{CliError, Result};

/// Full scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub simulation: SimulationConfig,
    pub rate_factors: Vec<RateFactorConfig>,
    #[serde(default)]
    pub fx: Option<FxConfig>,
    #[serde(default)]
    pub correlation: Option<CorrelationConfig>,
    pub trade: TradeConfig,
}

/// Path count, seed and schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub n_paths: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_true")]
    pub discounted: bool,
    pub schedule: ScheduleConfig,
}

/// Simulation dates, explicit or uniform. Either form must start at
/// valuation (0).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScheduleConfig {
    Explicit {
        dates: Vec<f64>,
    },
    Uniform {
        #[serde(default)]
        start: f64,
        step: f64,
        count: usize,
    },
}

/// Base curve of a rate factor: flat or pillar-interpolated.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CurveConfig {
    Flat {
        flat: f64,
    },
    Pillars {
        tenors: Vec<f64>,
        rates: Vec<f64>,
        #[serde(default)]
        interpolation: CurveInterpolation,
        #[serde(default = "default_true")]
        extrapolate: bool,
    },
}

/// Hull-White rate factor.
#[derive(Debug, Clone, Deserialize)]
pub struct RateFactorConfig {
    pub name: String,
    pub mean_reversion: f64,
    pub volatility: f64,
    pub curve: CurveConfig,
}

/// FX spot factor.
#[derive(Debug, Clone, Deserialize)]
pub struct FxConfig {
    pub name: String,
    pub domestic: String,
    pub foreign: String,
    pub spot: f64,
    pub volatility: f64,
}

/// Row-major correlation of the factor shocks in declaration order
/// (rate factors, then FX).
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationConfig {
    pub matrix: Vec<Vec<f64>>,
}

/// Fixed leg side of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionConfig {
    Payer,
    Receiver,
}

impl From<DirectionConfig> for SwapDirection {
    fn from(direction: DirectionConfig) -> Self {
        match direction {
            DirectionConfig::Payer => SwapDirection::Payer,
            DirectionConfig::Receiver => SwapDirection::Receiver,
        }
    }
}

/// Trade to simulate.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeConfig {
    FxForward {
        fx_spot: String,
        domestic: String,
        foreign: String,
        strike: f64,
        #[serde(default = "default_notional")]
        notional: f64,
        maturity: f64,
    },
    Swap {
        curve: String,
        direction: DirectionConfig,
        /// Fixed rate; the par rate on the base curve when omitted.
        #[serde(default)]
        fixed_rate: Option<f64>,
        #[serde(default = "default_notional")]
        notional: f64,
        maturity: f64,
        tenor: f64,
        #[serde(default)]
        spread: f64,
    },
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_true() -> bool {
    true
}

fn default_notional() -> f64 {
    1.0
}

impl ScenarioConfig {
    /// Load a scenario from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Failed to read scenario file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse a scenario from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CliError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Engine configuration of the scenario.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::builder()
            .seed(self.simulation.seed)
            .discounted(self.simulation.discounted)
            .build()
    }

    /// Simulation schedule.
    pub fn dates(&self) -> Result<SimulationDates> {
        let dates = match &self.simulation.schedule {
            ScheduleConfig::Explicit { dates } => SimulationDates::new(dates.clone()),
            ScheduleConfig::Uniform { start, step, count } => {
                SimulationDates::uniform(*start, *step, *count)
            }
        };
        dates.map_err(|e| ExposureError::from(e).into())
    }

    /// Factors of the scenario, rate factors first.
    pub fn build_models(&self) -> Result<ModelMap> {
        let mut models = ModelMap::new(self.dates()?, self.simulation.n_paths)?;
        for factor in &self.rate_factors {
            let params = HullWhiteParams::new(factor.mean_reversion, factor.volatility)
                .map_err(ExposureError::from)?;
            models.add_rate_factor(&factor.name, factor.curve.build()?, params)?;
        }
        if let Some(fx) = &self.fx {
            models.add_fx_spot(&fx.name, &fx.domestic, &fx.foreign, fx.spot, fx.volatility)?;
        }
        Ok(models)
    }

    /// Flattened correlation matrix, validated for shape.
    pub fn correlation(&self) -> Result<Option<Vec<f64>>> {
        let Some(config) = &self.correlation else {
            return Ok(None);
        };
        let dim = config.matrix.len();
        if config.matrix.iter().any(|row| row.len() != dim) {
            return Err(CliError::Config(
                "correlation matrix must be square".to_string(),
            ));
        }
        Ok(Some(config.matrix.concat()))
    }

    /// Check the correlation against the factor count and for positive
    /// semi-definiteness.
    pub fn validate_correlation(&self, n_factors: usize) -> Result<()> {
        match self.correlation()? {
            Some(data) => {
                let matrix =
                    CorrelationMatrix::new(&data, n_factors).map_err(ExposureError::from)?;
                matrix.cholesky().map_err(ExposureError::from)?;
                Ok(())
            }
            None if n_factors > 1 => Err(CliError::Config(format!(
                "a correlation matrix is required for {} factors",
                n_factors
            ))),
            None => Ok(()),
        }
    }

    /// Trade of the scenario.
    pub fn build_trade(&self) -> Result<Box<dyn Trade>> {
        match &self.trade {
            TradeConfig::FxForward {
                fx_spot,
                domestic,
                foreign,
                strike,
                notional,
                maturity,
            } => Ok(Box::new(FxForward::new(
                fx_spot.as_str(),
                domestic.as_str(),
                foreign.as_str(),
                *strike,
                *notional,
                *maturity,
            ))),
            TradeConfig::Swap {
                curve,
                direction,
                fixed_rate,
                notional,
                maturity,
                tenor,
                spread,
            } => {
                let direction = SwapDirection::from(*direction);
                let swap = InterestRateSwap::vanilla(
                    curve.as_str(),
                    direction,
                    fixed_rate.unwrap_or(0.0),
                    *notional,
                    *maturity,
                    *tenor,
                )?
                .with_spread(*spread);
                if fixed_rate.is_some() {
                    return Ok(Box::new(swap));
                }

                let base = self
                    .rate_factors
                    .iter()
                    .find(|f| &f.name == curve)
                    .ok_or_else(|| ExposureError::UnknownFactor(curve.clone()))?
                    .curve
                    .build()?;
                let par = swap.par_rate(&base)?;
                tracing::info!(curve = %curve, par_rate = par, "Swap struck at par");
                Ok(Box::new(
                    InterestRateSwap::vanilla(
                        curve.as_str(),
                        direction,
                        par,
                        *notional,
                        *maturity,
                        *tenor,
                    )?
                    .with_spread(*spread),
                ))
            }
        }
    }
}

impl CurveConfig {
    /// Build the base curve.
    pub fn build(&self) -> Result<CurveEnum<f64>> {
        match self {
            CurveConfig::Flat { flat } => Ok(CurveEnum::flat(*flat)),
            CurveConfig::Pillars {
                tenors,
                rates,
                interpolation,
                extrapolate,
            } => InterpolatedCurve::new(tenors, rates, *interpolation, *extrapolate)
                .map(CurveEnum::from)
                .map_err(|e| CliError::Config(format!("Invalid curve: {}", e))),
        }
    }
}
