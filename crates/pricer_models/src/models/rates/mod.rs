//! Interest rate simulation factors.
//!
//! - [`HullWhiteFactor`]: per-path Hull-White one-factor short rates with a
//!   running bank-account numeraire
//! - [`SimulatedCurve`]: borrowed view turning a base curve and a factor
//!   into path-conditioned discount factors and forward rates
//!
//! # Model
//!
//! ```text
//! dr(t) = [theta(t) - a * r(t)] * dt + sigma * dW(t)
//! ```
//!
//! theta(t) is never materialised: the factor works with
//! `beta(t) = f(0, t) + convexity(t)` and steps exactly between dates.

pub mod hull_white;
pub mod simulated_curve;

pub use hull_white::{HullWhiteFactor, HullWhiteParams};
pub use simulated_curve::{SimulatedCurve, DATE_TOLERANCE};
