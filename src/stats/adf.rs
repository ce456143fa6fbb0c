//! Augmented Dickey-Fuller unit-root test.
//!
//! Regression (for lag order k and the configured deterministic terms):
//!
//! ```text
//! Δy_t = ρ y_{t-1} + Σ_{i=1..k} φ_i Δy_{t-i} [+ c] [+ δ t] + ε_t
//! ```
//!
//! The reported statistic is the t-ratio on ρ. Under the null the series
//! has a unit root, so the statistic follows the Dickey-Fuller
//! distribution rather than Student's t; p-values come from the MacKinnon
//! response-surface approximation (a normal CDF of a polynomial in tau).
//!
//! Lag order is either fixed by the caller or selected by AIC over
//! `0..=maxlag` with the Schwert rule for maxlag, holding the estimation
//! sample fixed across candidates so the criteria are comparable.

use nalgebra::{DMatrix, DVector};
use statrs::function::erf::erf;

use crate::domain::Trend;
use crate::error::PipelineError;
use crate::math::ols;

/// Raw test outcome; classification against a significance level happens
/// in the domain layer so the test itself stays a pure statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    pub lags: usize,
    pub nobs: usize,
    /// Asymptotic critical values at 1% / 5% / 10%.
    pub critical_values: [f64; 3],
}

/// Run the test on one column of the aligned dataset.
///
/// `lags = None` selects the lag order by AIC. Fails with `InvalidInput`
/// on non-finite data or when the series is too short to leave residual
/// degrees of freedom.
pub fn adf_test(
    values: &[f64],
    trend: Trend,
    lags: Option<usize>,
) -> Result<AdfResult, PipelineError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(PipelineError::InvalidInput(
            "unit-root test input contains non-finite values".to_string(),
        ));
    }

    let n = values.len();
    let min_len = 12 + n_deterministic(trend);
    if n < min_len {
        return Err(PipelineError::InvalidInput(format!(
            "unit-root test needs at least {min_len} observations, got {n}"
        )));
    }

    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    let k = match lags {
        Some(k) => k,
        None => select_lag_by_aic(values, &diffs, trend)?,
    };

    let fit = fit_level_regression(values, &diffs, trend, k, k)?;
    let statistic = fit.beta[0] / fit.std_errors[0];
    if !statistic.is_finite() {
        return Err(PipelineError::InvalidInput(
            "unit-root statistic is not finite (degenerate series?)".to_string(),
        ));
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p(statistic, trend),
        lags: k,
        nobs: fit.nobs,
        critical_values: critical_values(trend),
    })
}

fn n_deterministic(trend: Trend) -> usize {
    match trend {
        Trend::None => 0,
        Trend::Constant => 1,
        Trend::ConstantTrend => 2,
    }
}

/// Schwert (1989) rule of thumb, capped so every candidate regression
/// keeps residual degrees of freedom.
fn schwert_maxlag(n: usize, trend: Trend) -> usize {
    let rule = (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
    // Keep at least ~8 residual degrees of freedom at the largest lag.
    let cap = (n.saturating_sub(n_deterministic(trend) + 10)) / 2;
    rule.min(cap)
}

fn select_lag_by_aic(
    values: &[f64],
    diffs: &[f64],
    trend: Trend,
) -> Result<usize, PipelineError> {
    let maxlag = schwert_maxlag(values.len(), trend);

    let mut best: Option<(usize, f64)> = None;
    for k in 0..=maxlag {
        // Hold the sample start at `maxlag` so every candidate sees the
        // same observations; otherwise AICs are not comparable.
        let Ok(fit) = fit_level_regression(values, diffs, trend, k, maxlag) else {
            continue;
        };
        let aic = fit.aic();
        let better = match best {
            None => true,
            Some((_, best_aic)) => aic < best_aic,
        };
        if better {
            best = Some((k, aic));
        }
    }

    best.map(|(k, _)| k).ok_or_else(|| {
        PipelineError::InvalidInput(
            "no feasible lag order for the unit-root regression".to_string(),
        )
    })
}

/// Assemble and solve the level regression for lag order `k`, using
/// difference observations from `start` onward.
///
/// Column layout: `[y_{t-1}, Δy_{t-1..t-k}, const?, trend?]`, so the
/// statistic of interest is always on column 0.
fn fit_level_regression(
    values: &[f64],
    diffs: &[f64],
    trend: Trend,
    k: usize,
    start: usize,
) -> Result<crate::math::OlsFit, PipelineError> {
    let n_det = n_deterministic(trend);
    let n_params = 1 + k + n_det;
    let n_rows = diffs.len().saturating_sub(start);
    if n_rows <= n_params {
        return Err(PipelineError::InvalidInput(format!(
            "unit-root regression with lag {k} has no residual degrees of freedom"
        )));
    }

    let mut x = DMatrix::zeros(n_rows, n_params);
    let mut y = DVector::zeros(n_rows);

    for (row, t) in (start..diffs.len()).enumerate() {
        y[row] = diffs[t];
        // Lagged level: Δy_t is values[t+1]-values[t], so the level term
        // is values[t].
        x[(row, 0)] = values[t];
        for i in 1..=k {
            x[(row, i)] = diffs[t - i];
        }
        match trend {
            Trend::None => {}
            Trend::Constant => {
                x[(row, 1 + k)] = 1.0;
            }
            Trend::ConstantTrend => {
                x[(row, 1 + k)] = 1.0;
                x[(row, 2 + k)] = (row + 1) as f64;
            }
        }
    }

    ols(&x, &y).ok_or_else(|| {
        PipelineError::InvalidInput(format!(
            "unit-root regression with lag {k} is singular"
        ))
    })
}

fn critical_values(trend: Trend) -> [f64; 3] {
    // MacKinnon (2010) asymptotic 1% / 5% / 10% points.
    match trend {
        Trend::None => [-2.5658, -1.9410, -1.6168],
        Trend::Constant => [-3.4304, -2.8615, -2.5668],
        Trend::ConstantTrend => [-3.9588, -3.4105, -3.1271],
    }
}

fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

fn polyval(coeffs: &[f64], x: f64) -> f64 {
    coeffs
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}

/// MacKinnon approximate asymptotic p-value for the tau statistic.
///
/// For the no-constant and constant cases these are the MacKinnon (1994)
/// polynomial surfaces (two branches split at `tau_star`). For
/// constant+trend a single quadratic is used, fitted to reproduce the
/// asymptotic 1%/5%/10% critical points exactly.
pub fn mackinnon_p(tau: f64, trend: Trend) -> f64 {
    struct Surface {
        tau_min: f64,
        tau_max: f64,
        tau_star: f64,
        small_p: &'static [f64],
        large_p: &'static [f64],
    }

    const SURFACE_N: Surface = Surface {
        tau_min: -19.04,
        tau_max: 1.51,
        tau_star: -1.04,
        small_p: &[0.6344, 1.2378, 0.032496],
        large_p: &[0.4797, 0.93557, -0.06999, 0.033066],
    };
    const SURFACE_C: Surface = Surface {
        tau_min: -18.83,
        tau_max: 2.74,
        tau_star: -1.61,
        small_p: &[2.1659, 1.4412, 0.038269],
        large_p: &[1.7339, 0.93202, -0.12745, -0.010368],
    };
    const SURFACE_CT: Surface = Surface {
        tau_min: -16.18,
        tau_max: 0.7,
        tau_star: 0.0,
        small_p: &[2.7946, 1.3568, 0.016100],
        large_p: &[2.7946, 1.3568, 0.016100],
    };

    let surface = match trend {
        Trend::None => SURFACE_N,
        Trend::Constant => SURFACE_C,
        Trend::ConstantTrend => SURFACE_CT,
    };

    if tau <= surface.tau_min {
        return 0.0;
    }
    if tau >= surface.tau_max {
        return 1.0;
    }
    let poly = if tau <= surface.tau_star {
        surface.small_p
    } else {
        surface.large_p
    };
    standard_normal_cdf(polyval(poly, tau)).clamp(0.0, 1.0)
}
