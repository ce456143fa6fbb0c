//! Log-return transform.
//!
//! `r[t] = ln(p[t] / p[t-1])` for each date `t > 0`; the first date has no
//! return and is dropped, so output length is always input length minus
//! one. Non-positive prices have no defined log return — those entries
//! become NaN here and are filtered out by the alignment stage together
//! with every other gap, instead of silently shifting the date index.

use crate::domain::Series;
use crate::error::PipelineError;

/// Convert a price series into its daily log-return series.
///
/// Errors with `InvalidInput` when there are fewer than two observations;
/// a series that short has no returns at all and downstream stages would
/// only produce degenerate statistics from it.
pub fn log_returns(prices: &Series) -> Result<Series, PipelineError> {
    if prices.len() < 2 {
        return Err(PipelineError::InvalidInput(format!(
            "series '{}' has {} observation(s); need at least 2 to compute returns",
            prices.name,
            prices.len()
        )));
    }

    let mut dates = Vec::with_capacity(prices.len() - 1);
    let mut values = Vec::with_capacity(prices.len() - 1);
    for t in 1..prices.len() {
        let prev = prices.values[t - 1];
        let curr = prices.values[t];
        let r = if prev > 0.0 && curr > 0.0 && prev.is_finite() && curr.is_finite() {
            (curr / prev).ln()
        } else {
            f64::NAN
        };
        dates.push(prices.dates[t]);
        values.push(r);
    }

    Series::new(prices.name.clone(), dates, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    fn series(name: &str, values: Vec<f64>) -> Series {
        let dates = (1..=values.len() as u32).map(d).collect();
        Series::new(name, dates, values).unwrap()
    }

    #[test]
    fn output_is_one_shorter_than_input() {
        let prices = series("oil", vec![50.0, 52.0, 51.0, 53.5]);
        let returns = log_returns(&prices).unwrap();
        assert_eq!(returns.len(), prices.len() - 1);
        assert_eq!(returns.dates[0], d(2));
    }

    #[test]
    fn constant_growth_gives_constant_log_return() {
        // 100 -> 110 -> 121 is 10% growth per step: both returns ~ ln(1.1).
        let index = series("index", vec![100.0, 110.0, 121.0]);
        let oil = series("oil", vec![50.0, 55.0, 60.5]);

        for prices in [&index, &oil] {
            let returns = log_returns(prices).unwrap();
            for &r in &returns.values {
                assert_relative_eq!(r, 1.1_f64.ln(), epsilon = 1e-12);
                assert_relative_eq!(r, 0.0953, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn cumulative_returns_reconstruct_the_price_path() {
        let prices = series("gas", vec![2.5, 2.7, 2.4, 2.9, 3.1]);
        let returns = log_returns(&prices).unwrap();

        let mut cumulative = 0.0;
        for (t, &r) in returns.values.iter().enumerate() {
            cumulative += r;
            let reconstructed = prices.values[0] * cumulative.exp();
            assert_relative_eq!(reconstructed, prices.values[t + 1], epsilon = 1e-10);
        }
    }

    #[test]
    fn empty_and_single_point_series_are_invalid() {
        let empty = Series::new("x", vec![], vec![]).unwrap();
        assert!(matches!(
            log_returns(&empty),
            Err(PipelineError::InvalidInput(_))
        ));

        let single = series("x", vec![10.0]);
        assert!(matches!(
            log_returns(&single),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_positive_prices_become_nan_not_errors() {
        let prices = series("coal", vec![10.0, 0.0, 12.0, -3.0, 14.0]);
        let returns = log_returns(&prices).unwrap();
        assert!(returns.values[0].is_nan()); // 10 -> 0
        assert!(returns.values[1].is_nan()); // 0 -> 12
        assert!(returns.values[2].is_nan()); // 12 -> -3
        assert!(returns.values[3].is_nan()); // -3 -> 14
        assert_eq!(returns.len(), 4);
    }
}
