//! The analysis pipeline.
//!
//! Computation lives here, presentation lives in `app`. One run is:
//!
//! load inputs -> log-return transform -> date alignment -> descriptive
//! stats -> unit-root tests -> ARX-GARCH fit
//!
//! Per-step progress goes to stdout with the `[*]` prefix as it happens,
//! so a stalled download is visible immediately.

use crate::config::{RunConfig, Source};
use crate::data::{load_csv, YahooClient};
use crate::domain::{
    AdfOutcome, AlignedFrame, GarchFit, Series, SeriesForm, SeriesSummary, Stationarity,
};
use crate::error::PipelineError;
use crate::garch::fit_arx_garch;
use crate::stats::{adf_test, align, ensure_nonempty, log_returns, summarize};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub frame: AlignedFrame,
    pub summaries: Vec<SeriesSummary>,
    pub adf: Vec<AdfOutcome>,
    pub garch: GarchFit,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &RunConfig) -> Result<RunOutput, PipelineError> {
    let inputs = load_inputs(config)?;
    let returns = to_returns(inputs)?;

    let frame = align(&returns)?;
    ensure_nonempty(&frame)?;
    println!(
        "[*] Aligned dataset: {} rows x {} series",
        frame.n_rows(),
        frame.names.len()
    );

    let summaries = summarize(&frame);
    let adf = run_unit_root_tests(config, &frame)?;

    println!(
        "[*] Fitting ARX-GARCH(1,1) for '{}' (scale {})",
        config.dependent, config.scale
    );
    let garch = fit_arx_garch(&frame, &config.dependent, config.scale)?;
    println!(
        "[*] Converged after {} iterations, log-likelihood {:.4}",
        garch.iterations, garch.log_likelihood
    );

    Ok(RunOutput {
        frame,
        summaries,
        adf,
        garch,
    })
}

fn load_inputs(config: &RunConfig) -> Result<Vec<(Series, SeriesForm)>, PipelineError> {
    let needs_remote = config
        .inputs
        .iter()
        .any(|i| matches!(i.source, Source::Remote { .. }));
    let client = if needs_remote {
        Some(YahooClient::new()?)
    } else {
        None
    };

    let mut out = Vec::with_capacity(config.inputs.len());
    for input in &config.inputs {
        let series = match &input.source {
            Source::LocalCsv { path, column } => {
                println!("[*] Loading '{}' from {}", input.name, path.display());
                let series = load_csv(&input.name, path, column.as_deref())?;
                clip_to_window(series, config)?
            }
            Source::Remote { ticker } => {
                println!("[*] Downloading '{}' ({ticker})", input.name);
                let client = client.as_ref().ok_or_else(|| {
                    PipelineError::Download("HTTP client not initialized".to_string())
                })?;
                client.fetch_closes(
                    &input.name,
                    ticker,
                    config.start,
                    config.end,
                    &config.interval,
                )?
            }
        };
        println!("[*] '{}': {} observations", input.name, series.len());
        out.push((series, input.form));
    }

    Ok(out)
}

/// Restrict a local series to the configured sample window so file-based
/// and downloaded inputs cover the same range before alignment.
fn clip_to_window(series: Series, config: &RunConfig) -> Result<Series, PipelineError> {
    let (dates, values) = series
        .dates
        .into_iter()
        .zip(series.values)
        .filter(|(d, _)| *d >= config.start && *d <= config.end)
        .unzip();
    Series::new(series.name, dates, values)
}

fn to_returns(
    inputs: Vec<(Series, SeriesForm)>,
) -> Result<Vec<Series>, PipelineError> {
    inputs
        .into_iter()
        .map(|(series, form)| match form {
            SeriesForm::Prices => {
                println!("[*] Computing log returns for '{}'", series.name);
                log_returns(&series)
            }
            SeriesForm::Returns => Ok(series),
        })
        .collect()
}

fn run_unit_root_tests(
    config: &RunConfig,
    frame: &AlignedFrame,
) -> Result<Vec<AdfOutcome>, PipelineError> {
    let mut out = Vec::with_capacity(frame.names.len());
    for (name, column) in frame.names.iter().zip(frame.columns.iter()) {
        let result = adf_test(column, config.trend, config.adf_lags)?;
        let conclusion = Stationarity::from_p_value(result.p_value, config.significance);
        println!(
            "[*] ADF '{}': t = {:.4}, p = {:.4}, lags = {} -> {}",
            name,
            result.statistic,
            result.p_value,
            result.lags,
            conclusion.label()
        );
        out.push(AdfOutcome {
            name: name.clone(),
            statistic: result.statistic,
            p_value: result.p_value,
            lags: result.lags,
            nobs: result.nobs,
            critical_values: result.critical_values,
            conclusion,
        });
    }
    Ok(out)
}
