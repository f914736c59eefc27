//! FX simulation factors.
//!
//! - [`SimulatedFxSpot`]: lognormal spot whose drift is the domestic minus
//!   foreign short rate of two Hull-White factors

mod spot;

pub use spot::SimulatedFxSpot;
