//! # Pricer XVA (L3: Exposure)
//!
//! Monte Carlo counterparty exposure simulation and aggregation.
//!
//! This crate provides:
//! - [`ModelMap`](model_map::ModelMap): named, ordered simulation factors
//!   sharing one clock
//! - [`Trade`](trade::Trade) with FX forward and interest rate swap
//!   implementations
//! - [`ExposureEngine`](engine::ExposureEngine): the per-slice simulation
//!   loop producing an [`ExposureMatrix`](soa::ExposureMatrix)
//! - [`ExposureAggregator`](exposure::ExposureAggregator): EPE, ENE, EFV,
//!   PFE and effective EPE
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_xva (L3)              │
//! ├─────────────────────────────────────────┤
//! │  model_map/  - factors + shared clock   │
//! │  trade/      - FX forward, swap         │
//! │  engine/     - slice loop, config       │
//! │  soa/        - exposure matrix          │
//! │  exposure/   - EPE, ENE, EFV, PFE       │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │           pricer_models (L2)            │
//! │  Hull-White, FX spot, shocks            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::curves::CurveEnum;
//! use pricer_models::models::rates::HullWhiteParams;
//! use pricer_models::schedules::SimulationDates;
//! use pricer_xva::{EngineConfig, ExposureAggregator, ExposureEngine, FxForward, ModelMap};
//!
//! let dates = SimulationDates::uniform(0.0, 0.5, 11).unwrap();
//! let params = HullWhiteParams::new(0.1, 0.01).unwrap();
//! let mut models = ModelMap::new(dates, 1_000)
//!     .unwrap()
//!     .with_rate_factor("JPY", CurveEnum::flat(0.035), params)
//!     .unwrap()
//!     .with_rate_factor("USD", CurveEnum::flat(0.0175), params)
//!     .unwrap()
//!     .with_fx_spot("USDJPY", "JPY", "USD", 100.0, 0.1)
//!     .unwrap();
//!
//! let correlation = [
//!     1.0, -0.5, 0.5,
//!     -0.5, 1.0, -0.5,
//!     0.5, -0.5, 1.0,
//! ];
//! let mut forward = FxForward::new("USDJPY", "JPY", "USD", 109.144226, 1.0, 5.0);
//!
//! let engine = ExposureEngine::new(EngineConfig::builder().seed(2020).build());
//! let matrix = engine.run(&mut forward, &mut models, Some(&correlation)).unwrap();
//! let profile = ExposureAggregator::reduce(&matrix);
//!
//! assert_eq!(profile.len(), 11);
//! assert_eq!(*profile.epe().last().unwrap(), 0.0);
//! ```

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod exposure;
pub mod model_map;
pub mod soa;
pub mod trade;

// Re-export commonly used types
pub use engine::{EngineConfig, ExposureEngine};
pub use error::ExposureError;
pub use exposure::{ExposureAggregator, ExposureProfile};
pub use model_map::{FactorModel, ModelMap};
pub use soa::ExposureMatrix;
pub use trade::{AccrualPeriod, FxForward, InterestRateSwap, SwapDirection, Trade};
