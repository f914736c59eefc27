//! # Pricer Models (L2: Simulation Factors)
//!
//! Stochastic factors for Monte Carlo exposure simulation.
//!
//! This crate provides:
//! - [`SimulationDates`](schedules::SimulationDates): the shared schedule
//!   every factor of a run walks
//! - [`HullWhiteFactor`](models::rates::HullWhiteFactor): one-factor
//!   short-rate model with exact transitions between dates
//! - [`SimulatedCurve`](models::rates::SimulatedCurve): path-conditioned
//!   discount factors and forward rates
//! - [`SimulatedFxSpot`](models::fx::SimulatedFxSpot): lognormal FX spot
//!   with a domestic/foreign short rate drift
//! - [`CorrelationMatrix`](models::hybrid::CorrelationMatrix) and a positive
//!   semi-definite Cholesky factorisation
//! - [`PricerRng`](rng::PricerRng) and
//!   [`ShockGenerator`](rng::ShockGenerator) for reproducible shocks
//!
//! ## Design Principles
//!
//! - **Owned per-path state**: each factor owns its `Vec<f64>` buffers
//! - **Explicit slice protocol**: `advance` then `move_to_next_slice`
//! - **Validated construction**: invalid parameters fail with
//!   [`SimulationError`] before any path is simulated

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod models;
pub mod rng;
pub mod schedules;

pub use error::SimulationError;
