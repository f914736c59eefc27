//! # pricer_core: Market Data Foundation for Exposure Simulation
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the exposure stack. It provides the
//! deterministic inputs every simulation run starts from:
//! - The base curve contract [`YieldCurve`](market_data::curves::YieldCurve)
//! - Flat and pillar-interpolated curve implementations
//! - A static dispatch wrapper, [`CurveEnum`](market_data::curves::CurveEnum)
//! - Linear interpolation (`math::interpolators`)
//! - Error types: `MarketDataError`, `InterpolationError`
//!
//! Curve construction from market quotes (bootstrapping, calibration) lives
//! outside this workspace; curves arrive here already built and stay
//! immutable for the duration of a run.
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - num-traits: generic numerical computation
//! - thiserror: error derives
//! - serde: serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
//!
//! let curve = CurveEnum::flat(0.02_f64);
//! let df = curve.discount_factor(5.0).unwrap();
//! assert!((df - (-0.1_f64).exp()).abs() < 1e-12);
//! assert_eq!(curve.short_rate().unwrap(), 0.02);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for error types and `CurveInterpolation`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
