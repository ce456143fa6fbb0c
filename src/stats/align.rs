//! Date alignment and descriptive summary.
//!
//! Alignment is conservative: an inner join on dates across every input
//! series, then any row with a missing or non-finite entry is dropped. No
//! interpolation, no forward fill — a row survives only when every market
//! traded that day and every transform produced a defined value.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{AlignedFrame, Series, SeriesSummary};
use crate::error::PipelineError;

/// Inner-join the given series on their date index.
///
/// Column order follows input order. The result may have zero rows; the
/// caller decides whether that is fatal (the pipeline rejects it with
/// `EmptyDataset` before any statistics run).
pub fn align(series: &[Series]) -> Result<AlignedFrame, PipelineError> {
    if series.is_empty() {
        return Err(PipelineError::InvalidInput(
            "alignment requires at least one series".to_string(),
        ));
    }

    // Per-series date -> value lookup; only finite values participate, so
    // NaN returns (non-positive prices, provider gaps) fall out of the
    // intersection here.
    let maps: Vec<HashMap<NaiveDate, f64>> = series
        .iter()
        .map(|s| {
            s.dates
                .iter()
                .zip(s.values.iter())
                .filter(|(_, v)| v.is_finite())
                .map(|(d, v)| (*d, *v))
                .collect()
        })
        .collect();

    let mut dates: Vec<NaiveDate> = maps[0].keys().copied().collect();
    dates.retain(|d| maps.iter().all(|m| m.contains_key(d)));
    dates.sort_unstable();

    let names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
    let columns: Vec<Vec<f64>> = maps
        .iter()
        .map(|m| dates.iter().map(|d| m[d]).collect())
        .collect();

    Ok(AlignedFrame { dates, names, columns })
}

/// Fail fast on an empty frame so neither the stationarity tester nor the
/// model fitter ever sees zero rows.
pub fn ensure_nonempty(frame: &AlignedFrame) -> Result<(), PipelineError> {
    if frame.n_rows() == 0 {
        return Err(PipelineError::EmptyDataset(
            "no overlapping dates remain after alignment".to_string(),
        ));
    }
    Ok(())
}

/// Per-column min/max/mean/std over the aligned dataset.
///
/// Uses the sample standard deviation (n-1); a single-row frame reports
/// std = 0.
pub fn summarize(frame: &AlignedFrame) -> Vec<SeriesSummary> {
    frame
        .names
        .iter()
        .zip(frame.columns.iter())
        .map(|(name, col)| {
            let n = col.len() as f64;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            let mut sum = 0.0;
            for &v in col {
                min = min.min(v);
                max = max.max(v);
                sum += v;
            }
            let mean = sum / n;
            let std = if col.len() > 1 {
                let ss: f64 = col.iter().map(|v| (v - mean).powi(2)).sum();
                (ss / (n - 1.0)).sqrt()
            } else {
                0.0
            };
            SeriesSummary {
                name: name.clone(),
                min,
                max,
                mean,
                std,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, day).unwrap()
    }

    fn series(name: &str, days: &[u32], values: &[f64]) -> Series {
        Series::new(
            name,
            days.iter().map(|&x| d(x)).collect(),
            values.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn alignment_keeps_only_shared_dates() {
        let a = series("a", &[1, 2, 3, 4], &[0.1, 0.2, 0.3, 0.4]);
        let b = series("b", &[2, 3, 5], &[1.0, 2.0, 3.0]);

        let frame = align(&[a, b]).unwrap();
        assert_eq!(frame.dates, vec![d(2), d(3)]);
        assert_eq!(frame.column("a").unwrap(), &[0.2, 0.3]);
        assert_eq!(frame.column("b").unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn rows_with_nan_are_dropped() {
        let a = series("a", &[1, 2, 3], &[0.1, f64::NAN, 0.3]);
        let b = series("b", &[1, 2, 3], &[1.0, 2.0, 3.0]);

        let frame = align(&[a, b]).unwrap();
        assert_eq!(frame.dates, vec![d(1), d(3)]);
        for col in &frame.columns {
            assert!(col.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn aligned_dates_are_a_subset_of_every_input() {
        let a = series("a", &[1, 2, 4, 6], &[1.0, 2.0, 3.0, 4.0]);
        let b = series("b", &[2, 4, 5, 6], &[1.0, 2.0, 3.0, 4.0]);
        let c = series("c", &[1, 2, 4], &[1.0, 2.0, 3.0]);

        let frame = align(&[a.clone(), b.clone(), c.clone()]).unwrap();
        for date in &frame.dates {
            assert!(a.dates.contains(date));
            assert!(b.dates.contains(date));
            assert!(c.dates.contains(date));
        }
    }

    #[test]
    fn zero_overlap_yields_empty_frame_and_ensure_fails() {
        let a = series("a", &[1, 2], &[1.0, 2.0]);
        let b = series("b", &[3, 4], &[1.0, 2.0]);

        let frame = align(&[a, b]).unwrap();
        assert_eq!(frame.n_rows(), 0);
        assert!(matches!(
            ensure_nonempty(&frame),
            Err(PipelineError::EmptyDataset(_))
        ));
    }

    #[test]
    fn summary_is_ordered_and_consistent() {
        let a = series("a", &[1, 2, 3, 4], &[-0.02, 0.01, 0.03, -0.01]);
        let b = series("b", &[1, 2, 3, 4], &[0.5, 0.5, 0.5, 0.5]);

        let frame = align(&[a, b]).unwrap();
        let summary = summarize(&frame);

        assert_eq!(summary[0].name, "a");
        assert_eq!(summary[1].name, "b");
        for s in &summary {
            assert!(s.min <= s.mean && s.mean <= s.max);
            assert!(s.std >= 0.0);
        }
        assert_relative_eq!(summary[1].mean, 0.5, epsilon = 1e-12);
        assert_relative_eq!(summary[1].std, 0.0, epsilon = 1e-12);
        assert_relative_eq!(summary[0].mean, 0.0025, epsilon = 1e-12);
    }
}
