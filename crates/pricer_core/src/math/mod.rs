//! Numerical building blocks used by the curve implementations.
//!
//! - [`interpolators`]: one-dimensional interpolation over sorted knots

pub mod interpolators;
