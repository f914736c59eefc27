//! Simulation schedules.
//!
//! - [`SimulationDates`]: validated, shared sequence of simulation dates in
//!   years from valuation
//!
//! Calendar-based cashflow schedules are produced upstream; the simulator
//! only needs year fractions.

mod simulation_dates;

pub use simulation_dates::SimulationDates;
