//! Exposure aggregation.
//!
//! Reduces a simulated [`ExposureMatrix`] into the metrics used for
//! counterparty risk:
//!
//! - Expected positive, negative and future value profiles (EPE, ENE, EFV)
//! - Potential Future Exposure (PFE) at a confidence level
//! - Time-weighted and effective EPE

mod profile;

pub use profile::ExposureProfile;

use rayon::prelude::*;

use crate::soa::ExposureMatrix;

/// Compensated (Neumaier) running sum.
#[derive(Clone, Copy, Debug, Default)]
struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    #[inline]
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline]
    fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Exposure metric calculations.
///
/// Per-date reductions run in parallel over dates.
pub struct ExposureAggregator;

impl ExposureAggregator {
    /// Reduce every date of the matrix to `(EPE, ENE, EFV)`.
    ///
    /// Averages divide by the path count; a matrix without paths yields
    /// zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::exposure::ExposureAggregator;
    /// use pricer_xva::soa::ExposureMatrix;
    ///
    /// let m = ExposureMatrix::from_rows(
    ///     vec![0.0, 1.0],
    ///     vec![vec![10.0, -5.0, 3.0, 0.0], vec![5.0; 4]],
    /// )
    /// .unwrap();
    ///
    /// let profile = ExposureAggregator::reduce(&m);
    /// assert_eq!(profile.epe(), &[3.25, 5.0]);
    /// assert_eq!(profile.ene(), &[-1.25, 0.0]);
    /// assert_eq!(profile.efv(), &[2.0, 5.0]);
    /// ```
    pub fn reduce(matrix: &ExposureMatrix) -> ExposureProfile {
        let n_paths = matrix.n_paths();
        let rows = (0..matrix.n_dates())
            .into_par_iter()
            .map(|i| {
                if n_paths == 0 {
                    return (0.0, 0.0, 0.0);
                }
                let mut positive = NeumaierSum::default();
                let mut negative = NeumaierSum::default();
                for &v in matrix.row(i) {
                    if v > 0.0 {
                        positive.add(v);
                    } else {
                        negative.add(v);
                    }
                }
                let n = n_paths as f64;
                let (p, q) = (positive.total(), negative.total());
                (p / n, q / n, (p + q) / n)
            })
            .collect();

        ExposureProfile::from_rows(matrix.time_grid().to_vec(), rows)
    }

    /// Potential Future Exposure per date at `confidence`.
    ///
    /// PFE(t, α) = Quantile_α(max(V(t), 0)), using the order statistic at
    /// index `round((n - 1) α)`.
    pub fn potential_future_exposure(matrix: &ExposureMatrix, confidence: f64) -> Vec<f64> {
        let n_paths = matrix.n_paths();
        if n_paths == 0 {
            return vec![0.0; matrix.n_dates()];
        }

        let confidence = confidence.clamp(0.0, 1.0);
        let quantile_idx = ((n_paths as f64 - 1.0) * confidence).round() as usize;
        let quantile_idx = quantile_idx.min(n_paths - 1);

        (0..matrix.n_dates())
            .into_par_iter()
            .map(|i| {
                let mut exposures: Vec<f64> = matrix.row(i).iter().map(|v| v.max(0.0)).collect();
                exposures.sort_by(|a, b| a.total_cmp(b));
                exposures[quantile_idx]
            })
            .collect()
    }

    /// Largest value of a profile, floored at zero.
    #[inline]
    pub fn peak(profile: &[f64]) -> f64 {
        profile.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Time-weighted average of an exposure profile.
    ///
    /// Trapezoidal integration over the grid divided by its span. A single
    /// date returns its own value.
    pub fn time_weighted_epe(ee: &[f64], time_grid: &[f64]) -> f64 {
        if time_grid.len() < 2 || ee.len() != time_grid.len() {
            return ee.first().copied().unwrap_or(0.0);
        }

        let integral = trapezoid(ee, time_grid, f64::INFINITY);
        let span = time_grid[time_grid.len() - 1] - time_grid[0];
        if span > 0.0 {
            integral / span
        } else {
            ee[0]
        }
    }

    /// Effective EPE: time-weighted average of the non-decreasing envelope
    /// of EE up to `horizon`.
    pub fn effective_epe(ee: &[f64], time_grid: &[f64], horizon: f64) -> f64 {
        if time_grid.is_empty() || ee.len() != time_grid.len() {
            return 0.0;
        }

        let effective_ee: Vec<f64> = ee
            .iter()
            .scan(0.0_f64, |running_max, &v| {
                *running_max = running_max.max(v);
                Some(*running_max)
            })
            .collect();

        let end = time_grid[time_grid.len() - 1].min(horizon);
        let span = end - time_grid[0];
        if span > 0.0 {
            trapezoid(&effective_ee, time_grid, horizon) / span
        } else {
            effective_ee[0]
        }
    }
}

/// Trapezoid integral of `values` over `grid`, truncated at `horizon`.
fn trapezoid(values: &[f64], grid: &[f64], horizon: f64) -> f64 {
    let mut integral = NeumaierSum::default();
    for (t, v) in grid.windows(2).zip(values.windows(2)) {
        if t[0] >= horizon {
            break;
        }
        let dt = t[1].min(horizon) - t[0];
        if dt > 0.0 {
            integral.add(0.5 * (v[0] + v[1]) * dt);
        }
    }
    integral.total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix(rows: Vec<Vec<f64>>) -> ExposureMatrix {
        let grid = (0..rows.len()).map(|i| i as f64 * 0.25).collect();
        ExposureMatrix::from_rows(grid, rows).unwrap()
    }

    #[test]
    fn test_reduce_mixed_signs() {
        let m = matrix(vec![vec![10.0, 5.0, -5.0], vec![20.0, -10.0, 15.0]]);
        let profile = ExposureAggregator::reduce(&m);

        assert_relative_eq!(profile.epe()[0], 5.0, epsilon = 1e-10);
        assert_relative_eq!(profile.ene()[0], -5.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(profile.efv()[0], 10.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(profile.epe()[1], 35.0 / 3.0, epsilon = 1e-10);
        assert_relative_eq!(profile.ene()[1], -10.0 / 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_reduce_constant_rows() {
        let m = matrix(vec![vec![5.0; 7], vec![-3.0; 7]]);
        let profile = ExposureAggregator::reduce(&m);
        assert_eq!(profile.epe(), &[5.0, 0.0]);
        assert_eq!(profile.ene(), &[0.0, -3.0]);
        assert_eq!(profile.efv(), &[5.0, -3.0]);
    }

    #[test]
    fn test_reduce_no_paths() {
        let m = ExposureMatrix::new(vec![0.0, 1.0], 0);
        let profile = ExposureAggregator::reduce(&m);
        assert_eq!(profile.epe(), &[0.0, 0.0]);
    }

    #[test]
    fn test_compensated_sum_keeps_small_terms() {
        let mut s = NeumaierSum::default();
        for x in [1.0, 1e100, 1.0, -1e100] {
            s.add(x);
        }
        assert_eq!(s.total(), 2.0);
    }

    #[test]
    fn test_potential_future_exposure() {
        let m = ExposureMatrix::from_rows(vec![1.0], vec![vec![10.0, 5.0, 15.0, 20.0, 25.0]])
            .unwrap();

        // Sorted: [5, 10, 15, 20, 25]; index round(4 * 0.8) = 3.
        let pfe = ExposureAggregator::potential_future_exposure(&m, 0.80);
        assert_relative_eq!(pfe[0], 20.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pfe_floors_negative_values() {
        let m = ExposureMatrix::from_rows(vec![1.0], vec![vec![-10.0, -5.0, -1.0]]).unwrap();
        assert_eq!(ExposureAggregator::potential_future_exposure(&m, 0.99), vec![0.0]);
    }

    #[test]
    fn test_peak() {
        assert_eq!(ExposureAggregator::peak(&[10.0, 25.0, 15.0, 30.0, 20.0]), 30.0);
        assert_eq!(ExposureAggregator::peak(&[-1.0, -2.0]), 0.0);
    }

    #[test]
    fn test_time_weighted_epe() {
        let ee = vec![0.0, 10.0, 20.0, 15.0, 5.0];
        let time_grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];

        // 1.25 + 3.75 + 4.375 + 2.5
        let epe = ExposureAggregator::time_weighted_epe(&ee, &time_grid);
        assert_relative_eq!(epe, 11.875, epsilon = 1e-10);
    }

    #[test]
    fn test_effective_epe() {
        let ee = vec![10.0, 8.0, 12.0, 15.0, 10.0];
        let time_grid = vec![0.0, 0.25, 0.5, 0.75, 1.0];

        // Envelope [10, 10, 12, 15, 15]
        let eepe = ExposureAggregator::effective_epe(&ee, &time_grid, 1.0);
        assert_relative_eq!(eepe, 12.375, epsilon = 1e-10);

        // Truncated at 0.5: (2.5 + 2.75) / 0.5
        let short = ExposureAggregator::effective_epe(&ee, &time_grid, 0.5);
        assert_relative_eq!(short, 10.5, epsilon = 1e-10);

        assert!(eepe >= ExposureAggregator::time_weighted_epe(&ee, &time_grid));
    }
}
