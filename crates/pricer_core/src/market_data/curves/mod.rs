//! Base discount curves.
//!
//! This module provides:
//! - [`YieldCurve`]: the deterministic base curve contract used by the simulator
//! - [`FlatCurve`]: constant rate curve
//! - [`InterpolatedCurve`]: pillar-based curve
//! - [`CurveInterpolation`]: interpolation method selection
//! - [`CurveEnum`]: static dispatch wrapper over the concrete curves

mod curve_enum;
mod flat;
mod interpolated;
mod traits;

pub use curve_enum::CurveEnum;
pub use flat::FlatCurve;
pub use interpolated::{CurveInterpolation, InterpolatedCurve};
pub use traits::YieldCurve;
