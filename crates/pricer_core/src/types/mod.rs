//! Shared error types.
//!
//! - `error`: structured errors for interpolation operations
//!
//! [`InterpolationError`] is re-exported at module level.

pub mod error;

pub use error::InterpolationError;
