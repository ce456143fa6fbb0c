//! Export the aligned return dataset to CSV.
//!
//! Meant for debugging and for downstream scripts: the exact rows that fed
//! the statistics, one date column plus one column per series.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::AlignedFrame;
use crate::error::PipelineError;

/// Write the aligned frame to a CSV file.
pub fn write_frame_csv(path: &Path, frame: &AlignedFrame) -> Result<(), PipelineError> {
    let mut file = File::create(path).map_err(|e| {
        PipelineError::Write(format!("failed to create '{}': {e}", path.display()))
    })?;

    writeln!(file, "Date,{}", frame.names.join(","))
        .map_err(|e| PipelineError::Write(format!("failed to write CSV header: {e}")))?;

    for (row, date) in frame.dates.iter().enumerate() {
        let cells: Vec<String> = frame
            .columns
            .iter()
            .map(|col| format!("{:.10}", col[row]))
            .collect();
        writeln!(file, "{date},{}", cells.join(","))
            .map_err(|e| PipelineError::Write(format!("failed to write CSV row: {e}")))?;
    }

    Ok(())
}
