//! Formatted terminal output.
//!
//! Formatting is kept in one place so the statistics and fitting code
//! stays clean and testable, and so output changes are localized.

use crate::domain::{AdfOutcome, GarchFit, SeriesSummary};

/// Format the descriptive-statistics table.
pub fn format_descriptive(summaries: &[SeriesSummary], n_rows: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("Descriptive statistics (n={n_rows}):\n"));
    out.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>12} {:>12}\n",
        "series", "min", "max", "mean", "std"
    ));
    out.push_str(&format!(
        "{:-<24} {:-<12} {:-<12} {:-<12} {:-<12}\n",
        "", "", "", "", ""
    ));

    for s in summaries {
        out.push_str(&format!(
            "{:<24} {:>12.6} {:>12.6} {:>12.6} {:>12.6}\n",
            truncate(&s.name, 24),
            s.min,
            s.max,
            s.mean,
            s.std
        ));
    }

    out
}

/// Format the stationarity-test table.
pub fn format_adf(outcomes: &[AdfOutcome]) -> String {
    let mut out = String::new();

    out.push_str("Augmented Dickey-Fuller tests:\n");
    out.push_str(&format!(
        "{:<24} {:>12} {:>10} {:>6} {:>6}  {:<14}\n",
        "series", "t-statistic", "p-value", "lags", "nobs", "conclusion"
    ));
    out.push_str(&format!(
        "{:-<24} {:-<12} {:-<10} {:-<6} {:-<6}  {:-<14}\n",
        "", "", "", "", "", ""
    ));

    for o in outcomes {
        out.push_str(&format!(
            "{:<24} {:>12.4} {:>10.4} {:>6} {:>6}  {:<14}\n",
            truncate(&o.name, 24),
            o.statistic,
            o.p_value,
            o.lags,
            o.nobs,
            o.conclusion.label()
        ));
    }

    out
}

/// Format the fitted-model summary: header block, then the mean and
/// variance coefficient tables.
pub fn format_garch(fit: &GarchFit) -> String {
    let mut out = String::new();

    out.push_str("ARX - GARCH(1,1) model results\n");
    out.push_str(&format!("{:=<64}\n", ""));
    out.push_str(&format!("Dep. variable:    {}\n", fit.dependent));
    out.push_str(&format!(
        "Log-likelihood:   {:.4}    AIC: {:.4}    BIC: {:.4}\n",
        fit.log_likelihood, fit.aic, fit.bic
    ));
    out.push_str(&format!(
        "No. observations: {}    scale: {}\n",
        fit.nobs, fit.scale
    ));
    out.push_str(&format!("Iterations:       {}\n", fit.iterations));

    out.push_str("\nMean model:\n");
    out.push_str(&coefficient_table(&fit.mean));
    out.push_str("\nVolatility model:\n");
    out.push_str(&coefficient_table(&fit.variance));

    out
}

fn coefficient_table(coefficients: &[crate::domain::Coefficient]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:>12} {:>12} {:>10} {:>10}\n",
        "", "coef", "std err", "z", "P>|z|"
    ));
    out.push_str(&format!(
        "{:-<20} {:-<12} {:-<12} {:-<10} {:-<10}\n",
        "", "", "", "", ""
    ));
    for c in coefficients {
        out.push_str(&format!(
            "{:<20} {:>12.6} {:>12} {:>10} {:>10}\n",
            truncate(&c.name, 20),
            c.estimate,
            cell(c.std_error, 6),
            cell(c.z_stat, 3),
            cell(c.p_value, 4),
        ));
    }
    out
}

/// A numeric cell; NaN (e.g. standard errors at a constraint boundary)
/// prints as blank rather than as a fabricated number.
fn cell(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else {
        String::new()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coefficient, Stationarity};

    #[test]
    fn descriptive_table_has_one_row_per_series() {
        let summaries = vec![
            SeriesSummary {
                name: "Crude Oil".to_string(),
                min: -0.05,
                max: 0.04,
                mean: 0.0002,
                std: 0.012,
            },
            SeriesSummary {
                name: "Natural Gas".to_string(),
                min: -0.09,
                max: 0.11,
                mean: -0.0001,
                std: 0.031,
            },
        ];

        let table = format_descriptive(&summaries, 950);
        assert!(table.contains("n=950"));
        assert!(table.contains("Crude Oil"));
        assert!(table.contains("Natural Gas"));
        assert_eq!(table.lines().count(), 3 + summaries.len());
    }

    #[test]
    fn adf_table_shows_conclusions() {
        let outcomes = vec![AdfOutcome {
            name: "Crude Oil".to_string(),
            statistic: -12.3456,
            p_value: 0.0,
            lags: 2,
            nobs: 947,
            critical_values: [-3.4304, -2.8615, -2.5668],
            conclusion: Stationarity::Stationary,
        }];

        let table = format_adf(&outcomes);
        assert!(table.contains("-12.3456"));
        assert!(table.contains("Stationary"));
    }

    #[test]
    fn garch_summary_blanks_nan_inference_cells() {
        let fit = GarchFit {
            dependent: "Index".to_string(),
            mean: vec![Coefficient {
                name: "Const".to_string(),
                estimate: 0.0123,
                std_error: f64::NAN,
                z_stat: f64::NAN,
                p_value: f64::NAN,
            }],
            variance: vec![Coefficient {
                name: "omega".to_string(),
                estimate: 0.05,
                std_error: 0.01,
                z_stat: 5.0,
                p_value: 0.0,
            }],
            log_likelihood: -1234.5,
            aic: 2481.0,
            bic: 2510.4,
            nobs: 949,
            iterations: 812,
            scale: 100.0,
        };

        let summary = format_garch(&fit);
        assert!(summary.contains("Dep. variable:    Index"));
        assert!(summary.contains("omega"));
        assert!(summary.contains("5.000"));
        // The NaN row keeps its estimate but prints no std err / z / p.
        let const_line = summary
            .lines()
            .find(|l| l.starts_with("Const"))
            .unwrap();
        assert!(const_line.contains("0.012300"));
        assert!(!const_line.contains("NaN"));
    }
}
