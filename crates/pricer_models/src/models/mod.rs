//! Simulation factors.
//!
//! This module provides the state-carrying factors of an exposure run:
//! - [`rates`]: Hull-White short-rate factor and the simulated curve view
//! - [`fx`]: lognormal FX spot driven by two rate factors
//! - [`hybrid`]: factor correlation and its Cholesky factor
//!
//! ## Design Philosophy
//!
//! Each factor exclusively owns its per-path state and exposes it only as
//! `&[f64]` snapshots. Factors never hold references to one another; a
//! factor that depends on others receives them as arguments when it
//! advances, and the caller keeps every factor on the same slice.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::rates::{HullWhiteFactor, HullWhiteParams, SimulatedCurve};
//! use pricer_models::schedules::SimulationDates;
//! use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
//!
//! let curve = CurveEnum::flat(0.01);
//! let dates = SimulationDates::new(vec![0.0, 1.0]).unwrap();
//! let params = HullWhiteParams::new(0.1, 0.0).unwrap();
//! let mut factor = HullWhiteFactor::from_curve(params, dates, 8, &curve).unwrap();
//!
//! factor.advance(curve.short_rate().unwrap(), &[0.0; 8]).unwrap();
//! factor.move_to_next_slice();
//! factor.advance(curve.forward_rate(0.0, 1.0).unwrap(), &[0.0; 8]).unwrap();
//!
//! let view = SimulatedCurve::new(&curve, &factor);
//! let df = view.discount_factors(3.0).unwrap();
//! assert!((df[0] - (-0.02_f64).exp()).abs() < 1e-12);
//! ```

pub mod fx;
pub mod hybrid;
pub mod rates;
