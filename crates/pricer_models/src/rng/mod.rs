//! Random number generation for the simulation.
//!
//! - [`PricerRng`]: seeded `StdRng` wrapper with standard normal draws
//! - [`ShockGenerator`]: per-slice, per-factor shock buffers, correlated
//!   through a Cholesky factor when more than one factor is simulated

mod prng;
mod shocks;

pub use prng::PricerRng;
pub use shocks::ShockGenerator;
