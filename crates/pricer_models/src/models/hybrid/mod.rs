//! Cross-factor structure.
//!
//! - [`CorrelationMatrix`]: validated factor correlation
//! - [`CholeskyFactor`]: positive semi-definite factorisation used to
//!   correlate independent shocks

pub mod correlated;

pub use correlated::{CholeskyFactor, CorrelationError, CorrelationMatrix};
