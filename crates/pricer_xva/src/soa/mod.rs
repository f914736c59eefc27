//! Structure of Arrays (SoA) storage for simulated exposures.
//!
//! The engine writes one contiguous row per simulation date so that the
//! per-date reductions of the aggregator stream through memory.

mod exposure_matrix;

pub use exposure_matrix::ExposureMatrix;
