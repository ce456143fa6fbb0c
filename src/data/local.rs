//! Local CSV ingest.
//!
//! Expects a header row with a `Date` column plus at least one value
//! column. The value column can be named explicitly in the input
//! configuration; otherwise the first non-date column is used. Rows with a
//! blank date or blank value are skipped; an unparseable date or value is
//! an error, because silently dropping a malformed row hides data-entry
//! problems.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::Series;
use crate::error::PipelineError;

/// Load one value series from a CSV file.
pub fn load_csv(
    name: &str,
    path: &Path,
    column: Option<&str>,
) -> Result<Series, PipelineError> {
    let file = File::open(path).map_err(|e| {
        PipelineError::MissingInput(format!("failed to open '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| {
            PipelineError::InvalidInput(format!(
                "failed to read headers of '{}': {e}",
                path.display()
            ))
        })?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = *header_map.get("date").ok_or_else(|| {
        PipelineError::InvalidInput(format!("'{}' has no Date column", path.display()))
    })?;
    let value_idx = resolve_value_column(path, column, &headers, &header_map, date_idx)?;

    let mut rows: Vec<(NaiveDate, f64)> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1, first record is line 2.
        let line = idx + 2;
        let record = result.map_err(|e| {
            PipelineError::InvalidInput(format!("'{}' line {line}: {e}", path.display()))
        })?;

        let date_raw = record.get(date_idx).map(str::trim).unwrap_or("");
        let value_raw = record.get(value_idx).map(str::trim).unwrap_or("");
        if date_raw.is_empty() || value_raw.is_empty() {
            continue;
        }

        let date = parse_date(date_raw).ok_or_else(|| {
            PipelineError::InvalidInput(format!(
                "'{}' line {line}: invalid date '{date_raw}'",
                path.display()
            ))
        })?;
        let value = value_raw.parse::<f64>().map_err(|e| {
            PipelineError::InvalidInput(format!(
                "'{}' line {line}: invalid value '{value_raw}': {e}",
                path.display()
            ))
        })?;

        rows.push((date, value));
    }

    if rows.is_empty() {
        return Err(PipelineError::EmptyDataset(format!(
            "'{}' contains no usable rows",
            path.display()
        )));
    }

    // Exports are not always date-sorted; Series::new then rejects any
    // remaining duplicates.
    rows.sort_by_key(|(d, _)| *d);
    let (dates, values) = rows.into_iter().unzip();
    Series::new(name, dates, values)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel CSV exports often carry a BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_value_column(
    path: &Path,
    column: Option<&str>,
    headers: &StringRecord,
    header_map: &HashMap<String, usize>,
    date_idx: usize,
) -> Result<usize, PipelineError> {
    match column {
        Some(name) => header_map
            .get(&normalize_header_name(name))
            .copied()
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!(
                    "'{}' has no column '{name}'",
                    path.display()
                ))
            }),
        None => (0..headers.len())
            .find(|&idx| idx != date_idx)
            .ok_or_else(|| {
                PipelineError::InvalidInput(format!(
                    "'{}' has no value column beside Date",
                    path.display()
                ))
            }),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    FMTS.iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::PathBuf;

    fn write_csv(tag: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "commodity-garch-local-{}-{tag}.csv",
            std::process::id()
        ));
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_date_and_first_value_column() {
        let path = write_csv(
            "basic",
            "Date,Return\n2020-01-02,0.001\n2020-01-03,-0.002\n",
        );
        let series = load_csv("Index", &path, None).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values, vec![0.001, -0.002]);
        assert_eq!(
            series.dates[0],
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()
        );
    }

    #[test]
    fn named_column_is_selected_case_insensitively() {
        let path = write_csv(
            "named",
            "Date,Open,Close\n2020-01-02,1.0,2.0\n2020-01-03,3.0,4.0\n",
        );
        let series = load_csv("Index", &path, Some("close")).unwrap();
        assert_eq!(series.values, vec![2.0, 4.0]);
    }

    #[test]
    fn blank_rows_are_skipped_and_order_restored() {
        let path = write_csv(
            "blanks",
            "Date,Return\n2020-01-03,0.2\n2020-01-02,0.1\n,\n2020-01-06,\n2020-01-07,0.3\n",
        );
        let series = load_csv("Index", &path, None).unwrap();
        assert_eq!(series.values, vec![0.1, 0.2, 0.3]);
        assert!(series.dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn missing_file_is_missing_input() {
        let path = PathBuf::from("/nonexistent/returns.csv");
        assert!(matches!(
            load_csv("Index", &path, None),
            Err(PipelineError::MissingInput(_))
        ));
    }

    #[test]
    fn malformed_value_is_invalid_input() {
        let path = write_csv("badval", "Date,Return\n2020-01-02,abc\n");
        assert!(matches!(
            load_csv("Index", &path, None),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let path = write_csv(
            "dupes",
            "Date,Return\n2020-01-02,0.1\n2020-01-02,0.2\n",
        );
        assert!(matches!(
            load_csv("Index", &path, None),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_file_is_empty_dataset() {
        let path = write_csv("empty", "Date,Return\n");
        assert!(matches!(
            load_csv("Index", &path, None),
            Err(PipelineError::EmptyDataset(_))
        ));
    }
}
