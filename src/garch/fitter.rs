//! Maximum-likelihood estimation of the ARX + GARCH(1,1) model.
//!
//! Mean equation (one autoregressive lag plus exogenous regressors):
//!
//! ```text
//! y_t = c + φ y_{t-1} + Σ_j b_j x_{j,t} + ε_t
//! ```
//!
//! Variance equation:
//!
//! ```text
//! h_t = ω + α ε²_{t-1} + β h_{t-1},     ε_t | t-1 ~ N(0, h_t)
//! ```
//!
//! All parameters are estimated jointly by minimizing the Gaussian
//! negative log-likelihood with Nelder-Mead; constraint violations
//! (`ω > 0`, `α ≥ 0`, `β ≥ 0`, `α + β < 0.999`) are handled as penalty
//! walls in the objective. Standard errors come from the inverse of a
//! finite-difference Hessian at the optimum.
//!
//! Return data is rescaled (typically by 100) before fitting: daily log
//! returns are on the order of 1e-2, their variance 1e-4, and ω an order
//! below that, which puts the optimizer uncomfortably close to its
//! coordinate tolerances. Coefficients are reported on the scaled data.

use nalgebra::{DMatrix, DVector};
use statrs::function::erf::erf;

use crate::domain::{AlignedFrame, Coefficient, GarchFit};
use crate::error::PipelineError;
use crate::math::{minimize, ols, NelderMeadOptions};

const PENALTY: f64 = 1e30;
const MIN_VAR: f64 = 1e-12;
const LN_2PI: f64 = 1.837877066409345;

/// Fit the model with `dependent` as y and every other frame column as an
/// exogenous regressor, in frame order.
///
/// Fails with `Convergence` when the dependent series is degenerate
/// (zero variance) or when the optimizer exhausts its budget without
/// meeting its tolerances.
pub fn fit_arx_garch(
    frame: &AlignedFrame,
    dependent: &str,
    scale: f64,
) -> Result<GarchFit, PipelineError> {
    let y_raw = frame.column(dependent).ok_or_else(|| {
        PipelineError::InvalidInput(format!("dependent series '{dependent}' not in dataset"))
    })?;
    if y_raw.len() < 20 {
        return Err(PipelineError::InvalidInput(format!(
            "model estimation needs at least 20 aligned observations, got {}",
            y_raw.len()
        )));
    }

    let y: Vec<f64> = y_raw.iter().map(|v| v * scale).collect();
    let mut exog_names = Vec::new();
    let mut exog: Vec<Vec<f64>> = Vec::new();
    for (name, col) in frame.names.iter().zip(frame.columns.iter()) {
        if name != dependent {
            exog_names.push(name.clone());
            exog.push(col.iter().map(|v| v * scale).collect());
        }
    }

    if sample_variance(&y) < MIN_VAR {
        return Err(PipelineError::Convergence(format!(
            "dependent series '{dependent}' has zero variance; nothing to model"
        )));
    }

    let theta0 = starting_values(&y, &exog);
    let objective = |theta: &[f64]| negative_log_likelihood(theta, &y, &exog);

    let n_params = theta0.len();
    let minimum = minimize(
        &objective,
        &theta0,
        NelderMeadOptions {
            max_iters: 2000 * n_params,
            ..NelderMeadOptions::default()
        },
    );

    if !minimum.converged || minimum.value >= PENALTY {
        return Err(PipelineError::Convergence(format!(
            "likelihood optimization for '{dependent}' did not converge \
             after {} iterations",
            minimum.iterations
        )));
    }

    let std_errors = hessian_std_errors(&objective, &minimum.x);

    let k = exog.len();
    let mut mean_names = vec!["Const".to_string(), format!("{dependent}[1]")];
    mean_names.extend(exog_names.iter().cloned());
    let variance_names = ["omega", "alpha[1]", "beta[1]"];

    let coefficient = |name: &str, idx: usize| {
        let estimate = minimum.x[idx];
        let std_error = std_errors[idx];
        let z_stat = if std_error > 0.0 {
            estimate / std_error
        } else {
            f64::NAN
        };
        let p_value = if z_stat.is_finite() {
            2.0 * (1.0 - standard_normal_cdf(z_stat.abs()))
        } else {
            f64::NAN
        };
        Coefficient {
            name: name.to_string(),
            estimate,
            std_error,
            z_stat,
            p_value,
        }
    };

    let mean = mean_names
        .iter()
        .enumerate()
        .map(|(i, name)| coefficient(name, i))
        .collect();
    let variance = variance_names
        .iter()
        .enumerate()
        .map(|(i, name)| coefficient(name, 2 + k + i))
        .collect();

    // One observation feeds the autoregressive lag.
    let nobs = y.len() - 1;
    let log_likelihood = -minimum.value;
    let p = n_params as f64;

    Ok(GarchFit {
        dependent: dependent.to_string(),
        mean,
        variance,
        log_likelihood,
        aic: 2.0 * p - 2.0 * log_likelihood,
        bic: p * (nobs as f64).ln() - 2.0 * log_likelihood,
        nobs,
        iterations: minimum.iterations,
        scale,
    })
}

/// Parameter layout: `[c, φ, b_1..b_k, ω, α, β]`.
fn negative_log_likelihood(theta: &[f64], y: &[f64], exog: &[Vec<f64>]) -> f64 {
    let k = exog.len();
    let c = theta[0];
    let phi = theta[1];
    let b = &theta[2..2 + k];
    let omega = theta[2 + k];
    let alpha = theta[3 + k];
    let beta = theta[4 + k];

    if !(omega > 0.0) || alpha < 0.0 || beta < 0.0 || alpha + beta >= 0.999 {
        return PENALTY;
    }

    // Mean-equation residuals, t >= 1.
    let n = y.len();
    let mut eps = Vec::with_capacity(n - 1);
    for t in 1..n {
        let mut m = c + phi * y[t - 1];
        for (bj, x) in b.iter().zip(exog.iter()) {
            m += bj * x[t];
        }
        eps.push(y[t] - m);
    }

    // Backcast h_0 from the residual sample variance; fall back to the
    // unconditional variance when the residuals are degenerate.
    let mean_e = eps.iter().sum::<f64>() / eps.len() as f64;
    let mut h = eps.iter().map(|e| (e - mean_e).powi(2)).sum::<f64>() / eps.len() as f64;
    if !h.is_finite() || h <= 0.0 {
        h = omega / (1.0 - alpha - beta);
    }

    let mut nll = 0.0;
    for t in 0..eps.len() {
        if t > 0 {
            h = omega + alpha * eps[t - 1] * eps[t - 1] + beta * h;
        }
        let ht = h.max(MIN_VAR);
        nll += 0.5 * (LN_2PI + ht.ln() + eps[t] * eps[t] / ht);
    }

    if nll.is_finite() {
        nll
    } else {
        PENALTY
    }
}

/// OLS on the mean equation for the mean parameters; conventional
/// persistent-variance split for the GARCH parameters.
fn starting_values(y: &[f64], exog: &[Vec<f64>]) -> Vec<f64> {
    let k = exog.len();
    let n = y.len();
    let rows = n - 1;

    let mut design = DMatrix::zeros(rows, 2 + k);
    let mut target = DVector::zeros(rows);
    for t in 1..n {
        let row = t - 1;
        design[(row, 0)] = 1.0;
        design[(row, 1)] = y[t - 1];
        for (j, x) in exog.iter().enumerate() {
            design[(row, 2 + j)] = x[t];
        }
        target[row] = y[t];
    }

    let mut theta = Vec::with_capacity(5 + k);
    let resid_var = match ols(&design, &target) {
        Some(fit) => {
            theta.extend(fit.beta.iter().copied());
            (fit.ssr / fit.nobs as f64).max(MIN_VAR)
        }
        None => {
            // Collinear regressors: start flat and let the optimizer work.
            theta.push(y.iter().sum::<f64>() / n as f64);
            theta.extend(std::iter::repeat(0.0).take(1 + k));
            sample_variance(y).max(MIN_VAR)
        }
    };

    theta.push(0.05 * resid_var); // omega
    theta.push(0.05); // alpha
    theta.push(0.90); // beta
    theta
}

/// Standard errors from the inverse Hessian of the negative
/// log-likelihood, by central differences at the optimum.
///
/// A parameter pinned to a constraint boundary has no curvature to
/// measure: its stencil crosses the penalty wall, and differencing the
/// penalty value would manufacture an enormous Hessian entry and a
/// near-zero "standard error". Such parameters get NaN instead, and the
/// Hessian is restricted to the interior coordinates. The report prints
/// NaN cells as blanks.
fn hessian_std_errors<F>(f: &F, x: &[f64]) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let dim = x.len();
    let step: Vec<f64> = x.iter().map(|v| 1e-5 + 1e-4 * v.abs()).collect();

    let eval = |shift_i: usize, si: f64, shift_j: usize, sj: f64| {
        let mut p = x.to_vec();
        p[shift_i] += si * step[shift_i];
        p[shift_j] += sj * step[shift_j];
        f(&p)
    };

    let f0 = f(x);
    let mut out = vec![f64::NAN; dim];
    let mut diag = vec![f64::NAN; dim];
    let mut interior = Vec::with_capacity(dim);
    for i in 0..dim {
        let fp = eval(i, 1.0, i, 0.0);
        let fm = eval(i, -1.0, i, 0.0);
        if fp < PENALTY && fm < PENALTY {
            diag[i] = (fp - 2.0 * f0 + fm) / (step[i] * step[i]);
            interior.push(i);
        }
    }
    if interior.is_empty() {
        return out;
    }

    let n = interior.len();
    let mut hessian = DMatrix::zeros(n, n);
    for r in 0..n {
        hessian[(r, r)] = diag[interior[r]];
        for c in (r + 1)..n {
            let (i, j) = (interior[r], interior[c]);
            let fpp = eval(i, 1.0, j, 1.0);
            let fpm = eval(i, 1.0, j, -1.0);
            let fmp = eval(i, -1.0, j, 1.0);
            let fmm = eval(i, -1.0, j, -1.0);
            // A corner-only wall hit poisons this entry; the NaN then
            // fails the finite check below rather than faking a number.
            let value = if fpp < PENALTY && fpm < PENALTY && fmp < PENALTY && fmm < PENALTY {
                (fpp - fpm - fmp + fmm) / (4.0 * step[i] * step[j])
            } else {
                f64::NAN
            };
            hessian[(r, c)] = value;
            hessian[(c, r)] = value;
        }
    }

    if let Some(cov) = hessian.try_inverse() {
        for (r, &i) in interior.iter().enumerate() {
            let v = cov[(r, r)];
            if v.is_finite() && v > 0.0 {
                out[i] = v.sqrt();
            }
        }
    }
    out
}

fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}
