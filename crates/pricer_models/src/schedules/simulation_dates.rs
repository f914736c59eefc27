//! Shared simulation schedule.

use std::ops::Deref;
use std::sync::Arc;

use crate::error::SimulationError;

/// Ordered simulation dates in years from valuation.
///
/// Every factor of a run holds a clone of the same `SimulationDates`; clones
/// share one allocation, so the factors cannot disagree about the schedule.
///
/// # Invariants
///
/// - at least one date
/// - all dates finite, first date exactly 0 (valuation)
/// - strictly increasing
///
/// # Examples
///
/// ```
/// use pricer_models::schedules::SimulationDates;
///
/// let dates = SimulationDates::new(vec![0.0, 0.5, 1.0]).unwrap();
/// assert_eq!(dates.len(), 3);
/// assert_eq!(dates.last(), 1.0);
///
/// assert!(SimulationDates::new(vec![0.0, 0.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationDates {
    dates: Arc<[f64]>,
}

impl SimulationDates {
    /// Validate and wrap a date vector.
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidSchedule` if any invariant is violated.
    pub fn new(dates: Vec<f64>) -> Result<Self, SimulationError> {
        let Some(&first) = dates.first() else {
            return Err(SimulationError::InvalidSchedule(
                "at least one simulation date is required".to_string(),
            ));
        };
        if let Some(bad) = dates.iter().find(|t| !t.is_finite()) {
            return Err(SimulationError::InvalidSchedule(format!(
                "non-finite date {bad}"
            )));
        }
        if first != 0.0 {
            return Err(SimulationError::InvalidSchedule(format!(
                "first date must be valuation (0), got {first}"
            )));
        }
        if let Some(i) = (1..dates.len()).find(|&i| dates[i] <= dates[i - 1]) {
            return Err(SimulationError::InvalidSchedule(format!(
                "dates must be strictly increasing: t[{}] = {} <= t[{}] = {}",
                i,
                dates[i],
                i - 1,
                dates[i - 1]
            )));
        }

        Ok(Self {
            dates: dates.into(),
        })
    }

    /// Evenly spaced schedule `start, start + step, ...` with `count` dates.
    ///
    /// # Errors
    ///
    /// `InvalidSchedule` for `count == 0`, a non-positive step or a
    /// non-zero `start`.
    pub fn uniform(start: f64, step: f64, count: usize) -> Result<Self, SimulationError> {
        if step <= 0.0 || !step.is_finite() {
            return Err(SimulationError::InvalidSchedule(format!(
                "step must be positive, got {step}"
            )));
        }
        Self::new((0..count).map(|i| start + step * i as f64).collect())
    }

    /// Date at `slice`, if any.
    #[inline]
    pub fn get(&self, slice: usize) -> Option<f64> {
        self.dates.get(slice).copied()
    }

    /// Date preceding `slice`; slice 0 is valuation and has no
    /// predecessor, so it maps to itself.
    #[inline]
    pub fn previous(&self, slice: usize) -> f64 {
        match slice {
            0 => 0.0,
            i => self.dates[(i - 1).min(self.dates.len() - 1)],
        }
    }

    /// Final simulation date.
    #[inline]
    pub fn last(&self) -> f64 {
        self.dates[self.dates.len() - 1]
    }

    /// Whether two handles share the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dates, &other.dates)
    }
}

impl Deref for SimulationDates {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.dates
    }
}
