//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main"
//! that builds the run configuration, executes the pipeline, prints the
//! report tables, and persists the workbook. A failed workbook write is
//! reported but does not fail the run: by that point every number has
//! already been printed.

use crate::config::RunConfig;
use crate::error::PipelineError;

pub mod pipeline;

/// Entry point for the `cgarch` binary.
pub fn run() -> Result<(), PipelineError> {
    let config = RunConfig::default();
    let output = pipeline::run_analysis(&config)?;

    println!();
    println!(
        "{}",
        crate::report::format_descriptive(&output.summaries, output.frame.n_rows())
    );
    println!("{}", crate::report::format_adf(&output.adf));
    println!("{}", crate::report::format_garch(&output.garch));

    match crate::io::write_workbook(&config.output, &output.summaries, &output.adf) {
        Ok(()) => println!("[*] Report written to {}", config.output.display()),
        Err(err) => eprintln!("{err}"),
    }

    if let Some(path) = &config.debug_export {
        match crate::io::write_frame_csv(path, &output.frame) {
            Ok(()) => println!("[*] Aligned dataset exported to {}", path.display()),
            Err(err) => eprintln!("{err}"),
        }
    }

    Ok(())
}
