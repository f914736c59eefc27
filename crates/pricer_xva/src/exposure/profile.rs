//! Expected exposure profile.

use serde::{Deserialize, Serialize};

/// Expected exposures aligned to the simulation dates.
///
/// - `epe`: mean of `max(V, 0)`
/// - `ene`: mean of `min(V, 0)`, signed and non-positive
/// - `efv`: mean of `V`
///
/// `epe + ene == efv` at every date up to rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureProfile {
    time_grid: Vec<f64>,
    epe: Vec<f64>,
    ene: Vec<f64>,
    efv: Vec<f64>,
}

impl ExposureProfile {
    pub(crate) fn from_rows(time_grid: Vec<f64>, rows: Vec<(f64, f64, f64)>) -> Self {
        let mut epe = Vec::with_capacity(rows.len());
        let mut ene = Vec::with_capacity(rows.len());
        let mut efv = Vec::with_capacity(rows.len());
        for (p, n, v) in rows {
            epe.push(p);
            ene.push(n);
            efv.push(v);
        }
        Self {
            time_grid,
            epe,
            ene,
            efv,
        }
    }

    /// Simulation dates in years.
    #[inline]
    pub fn time_grid(&self) -> &[f64] {
        &self.time_grid
    }

    /// Expected positive exposure per date.
    #[inline]
    pub fn epe(&self) -> &[f64] {
        &self.epe
    }

    /// Expected negative exposure per date (non-positive).
    #[inline]
    pub fn ene(&self) -> &[f64] {
        &self.ene
    }

    /// Expected future value per date.
    #[inline]
    pub fn efv(&self) -> &[f64] {
        &self.efv
    }

    /// Number of dates.
    #[inline]
    pub fn len(&self) -> usize {
        self.time_grid.len()
    }

    /// `true` for an empty grid.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.time_grid.is_empty()
    }

    /// `(t, epe, ene, efv)` per date.
    pub fn rows(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.time_grid
            .iter()
            .zip(&self.epe)
            .zip(&self.ene)
            .zip(&self.efv)
            .map(|(((&t, &p), &n), &v)| (t, p, n, v))
    }
}
