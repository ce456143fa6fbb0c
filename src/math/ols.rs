//! Ordinary least squares with inference columns.
//!
//! The unit-root test solves a small regression per candidate lag order
//! and needs, beyond the coefficients:
//!
//! - the t-statistic denominator, i.e. coefficient standard errors from
//!   `σ² (XᵀX)⁻¹`
//! - the Gaussian log-likelihood, for AIC-based lag selection
//!
//! Implementation choices:
//! - SVD solve, so tall (n >> k) design matrices are handled robustly even
//!   when columns are nearly collinear (lagged differences often are).
//! - Progressively looser tolerances before giving up, because a rejected
//!   candidate lag is better than a non-finite coefficient.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A solved regression with the pieces the ADF machinery needs.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: DVector<f64>,
    pub std_errors: DVector<f64>,
    /// Sum of squared residuals.
    pub ssr: f64,
    pub nobs: usize,
    pub n_params: usize,
}

impl OlsFit {
    /// Gaussian log-likelihood at the MLE variance `ssr / n`.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        let sigma2 = (self.ssr / n).max(f64::MIN_POSITIVE);
        -0.5 * n * ((2.0 * std::f64::consts::PI).ln() + sigma2.ln() + 1.0)
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.n_params as f64
    }
}

/// Fit `y = Xβ + ε` and compute coefficient standard errors.
///
/// Returns `None` when the solve fails or `XᵀX` is singular, or when there
/// are no residual degrees of freedom.
pub fn ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<OlsFit> {
    let n = x.nrows();
    let k = x.ncols();
    if n <= k {
        return None;
    }

    let beta = solve_least_squares(x, y)?;

    let residuals = y - x * &beta;
    let ssr: f64 = residuals.iter().map(|r| r * r).sum();
    if !ssr.is_finite() {
        return None;
    }

    let sigma2 = ssr / (n - k) as f64;
    let xtx_inv = (x.transpose() * x).try_inverse()?;

    let mut std_errors = DVector::zeros(k);
    for i in 0..k {
        let v = sigma2 * xtx_inv[(i, i)];
        if !v.is_finite() || v < 0.0 {
            return None;
        }
        std_errors[i] = v.sqrt();
    }

    Some(OlsFit {
        beta,
        std_errors,
        ssr,
        nobs: n,
        n_params: k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert_relative_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn ols_recovers_coefficients_and_small_errors_on_clean_data() {
        // y = 1 + 0.5 x, exact; standard errors should be ~0.
        let xs: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let mut design = DMatrix::zeros(20, 2);
        let mut y = DVector::zeros(20);
        for (i, &xi) in xs.iter().enumerate() {
            design[(i, 0)] = 1.0;
            design[(i, 1)] = xi;
            y[i] = 1.0 + 0.5 * xi;
        }

        let fit = ols(&design, &y).unwrap();
        assert_relative_eq!(fit.beta[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(fit.beta[1], 0.5, epsilon = 1e-8);
        assert!(fit.std_errors[0] < 1e-6);
        assert!(fit.std_errors[1] < 1e-6);
        assert!(fit.ssr < 1e-12);
    }

    #[test]
    fn ols_rejects_underdetermined_systems() {
        let x = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        assert!(ols(&x, &y).is_none());
    }

    #[test]
    fn aic_penalizes_extra_parameters_on_equal_fit() {
        let xs: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let mut x1 = DMatrix::zeros(30, 2);
        let mut x2 = DMatrix::zeros(30, 3);
        let mut y = DVector::zeros(30);
        for (i, &xi) in xs.iter().enumerate() {
            // Noisy-ish deterministic target.
            let target = 2.0 + 0.3 * xi + (xi * 0.7).sin() * 0.05;
            x1[(i, 0)] = 1.0;
            x1[(i, 1)] = xi;
            x2[(i, 0)] = 1.0;
            x2[(i, 1)] = xi;
            // Redundant column: collinear-free but useless regressor.
            x2[(i, 2)] = (xi * 13.0).cos();
            y[i] = target;
        }

        let small = ols(&x1, &y).unwrap();
        let big = ols(&x2, &y).unwrap();
        // The redundant regressor cannot buy two AIC points here.
        assert!(small.aic() < big.aic() + 2.0);
    }
}
