//! Per-slice shock generation for a set of factors.

use super::PricerRng;
use crate::models::hybrid::CholeskyFactor;

/// Draws one slice worth of standard normal shocks for `n_factors` factors
/// over `n_paths` paths.
///
/// Shocks are stored factor-major so each factor reads a contiguous column:
/// [`column(j)`](Self::column) is the shock vector for the factor at ordinal
/// `j`. With a single factor the column is filled directly; with several,
/// each path draws `n_factors` independent normals which are correlated
/// through the Cholesky factor.
///
/// # Example
///
/// ```
/// use pricer_models::models::hybrid::CorrelationMatrix;
/// use pricer_models::rng::{PricerRng, ShockGenerator};
///
/// let corr = CorrelationMatrix::new(&[1.0, 1.0, 1.0, 1.0], 2).unwrap();
/// let mut shocks = ShockGenerator::correlated(PricerRng::from_seed(1), 4, corr.cholesky().unwrap());
/// shocks.draw();
/// assert_eq!(shocks.column(0), shocks.column(1));
/// ```
#[derive(Debug, Clone)]
pub struct ShockGenerator {
    rng: PricerRng,
    cholesky: Option<CholeskyFactor<f64>>,
    n_factors: usize,
    n_paths: usize,
    independent: Vec<f64>,
    correlated: Vec<f64>,
    shocks: Vec<f64>,
}

impl ShockGenerator {
    /// Generator for a single factor.
    pub fn single(rng: PricerRng, n_paths: usize) -> Self {
        Self {
            rng,
            cholesky: None,
            n_factors: 1,
            n_paths,
            independent: Vec::new(),
            correlated: Vec::new(),
            shocks: vec![0.0; n_paths],
        }
    }

    /// Generator for `cholesky.dim()` correlated factors.
    pub fn correlated(rng: PricerRng, n_paths: usize, cholesky: CholeskyFactor<f64>) -> Self {
        let n_factors = cholesky.dim();
        Self {
            rng,
            cholesky: Some(cholesky),
            n_factors,
            n_paths,
            independent: vec![0.0; n_factors],
            correlated: vec![0.0; n_factors],
            shocks: vec![0.0; n_factors * n_paths],
        }
    }

    /// Draw the shocks for the next slice, replacing the previous ones.
    pub fn draw(&mut self) {
        let Some(cholesky) = &self.cholesky else {
            self.rng.fill_normal(&mut self.shocks);
            return;
        };

        for p in 0..self.n_paths {
            self.rng.fill_normal(&mut self.independent);
            cholesky.transform_into(&self.independent, &mut self.correlated);
            for (j, &w) in self.correlated.iter().enumerate() {
                self.shocks[j * self.n_paths + p] = w;
            }
        }
    }

    /// Shocks of the factor at ordinal `factor` for the current slice.
    ///
    /// # Panics
    ///
    /// Panics if `factor >= n_factors`.
    #[inline]
    pub fn column(&self, factor: usize) -> &[f64] {
        &self.shocks[factor * self.n_paths..(factor + 1) * self.n_paths]
    }

    /// Number of factors served.
    #[inline]
    pub fn n_factors(&self) -> usize {
        self.n_factors
    }

    /// Number of paths per factor.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Seed of the underlying generator.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hybrid::CorrelationMatrix;

    fn sample_correlation(a: &[f64], b: &[f64]) -> f64 {
        let n = a.len() as f64;
        let ma = a.iter().sum::<f64>() / n;
        let mb = b.iter().sum::<f64>() / n;
        let cov: f64 = a.iter().zip(b).map(|(x, y)| (x - ma) * (y - mb)).sum();
        let va: f64 = a.iter().map(|x| (x - ma).powi(2)).sum();
        let vb: f64 = b.iter().map(|y| (y - mb).powi(2)).sum();
        cov / (va * vb).sqrt()
    }

    #[test]
    fn test_single_factor() {
        let mut generator = ShockGenerator::single(PricerRng::from_seed(3), 5);
        generator.draw();
        assert_eq!(generator.column(0).len(), 5);
        assert_eq!(generator.n_factors(), 1);

        let mut rng = PricerRng::from_seed(3);
        let mut expected = [0.0; 5];
        rng.fill_normal(&mut expected);
        assert_eq!(generator.column(0), &expected);
    }

    #[test]
    fn test_correlation_is_reproduced() {
        let corr = CorrelationMatrix::new(&[1.0, 0.6, 0.6, 1.0], 2).unwrap();
        let mut generator =
            ShockGenerator::correlated(PricerRng::from_seed(11), 20_000, corr.cholesky().unwrap());
        generator.draw();
        let rho = sample_correlation(generator.column(0), generator.column(1));
        assert!((rho - 0.6).abs() < 0.03, "rho = {rho}");
    }

    #[test]
    fn test_draws_change_between_slices() {
        let mut generator = ShockGenerator::single(PricerRng::from_seed(5), 4);
        generator.draw();
        let first = generator.column(0).to_vec();
        generator.draw();
        assert_ne!(first, generator.column(0));
    }

    #[test]
    fn test_same_seed_reproduces() {
        let corr: CorrelationMatrix<f64> = CorrelationMatrix::identity(3);
        let mut a = ShockGenerator::correlated(PricerRng::from_seed(9), 7, corr.cholesky().unwrap());
        let mut b = ShockGenerator::correlated(PricerRng::from_seed(9), 7, corr.cholesky().unwrap());
        a.draw();
        b.draw();
        for j in 0..3 {
            assert_eq!(a.column(j), b.column(j));
        }
        assert_eq!(a.seed(), 9);
    }
}
