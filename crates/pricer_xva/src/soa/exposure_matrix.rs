//! Dense date-by-path exposure storage.

/// Discounted MTM of every path at every simulation date.
///
/// # Memory Layout
///
/// Row-major, one contiguous row per date:
///
/// ```text
/// time_grid: [t0, t1, ..., tn]
/// row t0:    [v00, v01, ..., v0p]
/// row t1:    [v10, v11, ..., v1p]
/// ...
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureMatrix {
    time_grid: Vec<f64>,
    n_paths: usize,
    values: Vec<f64>,
}

impl ExposureMatrix {
    /// Zero-filled matrix for `time_grid.len()` dates and `n_paths` paths.
    pub fn new(time_grid: Vec<f64>, n_paths: usize) -> Self {
        let n = time_grid.len() * n_paths;
        Self {
            time_grid,
            n_paths,
            values: vec![0.0; n],
        }
    }

    /// Build from one row per date.
    ///
    /// Returns `None` when the row count differs from the grid or rows have
    /// different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use pricer_xva::soa::ExposureMatrix;
    ///
    /// let m = ExposureMatrix::from_rows(vec![0.0, 1.0], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    /// assert_eq!(m.row(1), &[3.0, 4.0]);
    /// assert_eq!(m.get(0, 1), 2.0);
    /// ```
    pub fn from_rows(time_grid: Vec<f64>, rows: Vec<Vec<f64>>) -> Option<Self> {
        if rows.len() != time_grid.len() {
            return None;
        }
        let n_paths = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_paths) {
            return None;
        }
        Some(Self {
            time_grid,
            n_paths,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of simulation dates.
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.time_grid.len()
    }

    /// Number of paths per date.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Simulation dates in years.
    #[inline]
    pub fn time_grid(&self) -> &[f64] {
        &self.time_grid
    }

    /// Path values at date index `date`.
    #[inline]
    pub fn row(&self, date: usize) -> &[f64] {
        &self.values[date * self.n_paths..(date + 1) * self.n_paths]
    }

    /// Mutable path values at date index `date`.
    #[inline]
    pub fn row_mut(&mut self, date: usize) -> &mut [f64] {
        &mut self.values[date * self.n_paths..(date + 1) * self.n_paths]
    }

    /// Value of path `path` at date index `date`.
    #[inline]
    pub fn get(&self, date: usize, path: usize) -> f64 {
        self.values[date * self.n_paths + path]
    }

    /// Rows in date order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.n_dates()).map(move |i| self.row(i))
    }

    /// Values along one path across all dates.
    pub fn path(&self, path: usize) -> Vec<f64> {
        (0..self.n_dates()).map(|i| self.get(i, path)).collect()
    }

    /// Flat row-major values.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
