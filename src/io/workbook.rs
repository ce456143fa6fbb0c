//! Two-sheet xlsx report.
//!
//! Sheet "Descriptive" carries one row per series with min/max/mean/std;
//! sheet "ADF Results" carries the stationarity test outcomes. Every
//! failure maps to a `Write` error, which the pipeline treats as
//! non-fatal: the numbers have already been printed by then, so a locked
//! or read-only output file should not discard the run.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::domain::{AdfOutcome, SeriesSummary};
use crate::error::PipelineError;

/// Write the report workbook to `path`, creating parent directories as
/// needed.
pub fn write_workbook(
    path: &Path,
    summaries: &[SeriesSummary],
    outcomes: &[AdfOutcome],
) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PipelineError::Write(format!(
                    "failed to create output directory '{}': {e}",
                    parent.display()
                ))
            })?;
        }
    }

    let mut workbook = Workbook::new();
    build_sheets(&mut workbook, summaries, outcomes)
        .map_err(|e| PipelineError::Write(format!("failed to build workbook: {e}")))?;

    workbook.save(path).map_err(|e| {
        PipelineError::Write(format!("failed to save '{}': {e}", path.display()))
    })?;

    Ok(())
}

fn build_sheets(
    workbook: &mut Workbook,
    summaries: &[SeriesSummary],
    outcomes: &[AdfOutcome],
) -> Result<(), XlsxError> {
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    write_descriptive(sheet, summaries, &bold)?;

    let sheet = workbook.add_worksheet();
    write_adf(sheet, outcomes, &bold)?;

    Ok(())
}

fn write_descriptive(
    sheet: &mut Worksheet,
    summaries: &[SeriesSummary],
    bold: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("Descriptive")?;

    for (col, header) in ["", "min", "max", "mean", "std"].iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }

    for (i, s) in summaries.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &s.name)?;
        sheet.write_number(row, 1, s.min)?;
        sheet.write_number(row, 2, s.max)?;
        sheet.write_number(row, 3, s.mean)?;
        sheet.write_number(row, 4, s.std)?;
    }

    sheet.set_column_width(0, 28)?;
    Ok(())
}

fn write_adf(
    sheet: &mut Worksheet,
    outcomes: &[AdfOutcome],
    bold: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name("ADF Results")?;

    for (col, header) in ["", "t-statistic", "p-value", "conclusion"]
        .iter()
        .enumerate()
    {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }

    for (i, o) in outcomes.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &o.name)?;
        sheet.write_number(row, 1, o.statistic)?;
        sheet.write_number(row, 2, o.p_value)?;
        sheet.write_string(row, 3, o.conclusion.label())?;
    }

    sheet.set_column_width(0, 28)?;
    Ok(())
}
