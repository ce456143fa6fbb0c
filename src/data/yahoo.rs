//! Yahoo Finance chart-API integration for daily closing prices.
//!
//! One GET per ticker against the v8 chart endpoint; the response carries
//! parallel arrays of unix timestamps and (possibly null) prices. Adjusted
//! closes are preferred when present, raw closes otherwise. Any transport
//! failure, non-success status, unparseable body, or empty result aborts
//! the run with a `Download` error; a silently missing series would
//! otherwise distort every downstream statistic.

use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::Series;
use crate::error::PipelineError;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = concat!("commodity-garch/", env!("CARGO_PKG_VERSION"));

pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    /// The endpoint rejects requests without a user agent, so the client
    /// is built rather than defaulted.
    pub fn new() -> Result<Self, PipelineError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::Download(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch closes for `ticker` over `[start, end]` (both ends inclusive)
    /// at the given sampling interval and return them under `name`.
    pub fn fetch_closes(
        &self,
        name: &str,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        interval: &str,
    ) -> Result<Series, PipelineError> {
        let period1 = unix_midnight(start);
        // The API treats period2 as exclusive; push it one day past the
        // configured end so the end date itself is covered.
        let period2 = unix_midnight(end.checked_add_days(Days::new(1)).ok_or_else(|| {
            PipelineError::InvalidInput(format!("end date {end} out of range"))
        })?);

        let url = format!("{BASE_URL}/{ticker}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", interval.to_string()),
            ])
            .send()
            .map_err(|e| {
                PipelineError::Download(format!("request for '{ticker}' failed: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(PipelineError::Download(format!(
                "request for '{ticker}' failed with status {}",
                resp.status()
            )));
        }

        let body: ChartResponse = resp.json().map_err(|e| {
            PipelineError::Download(format!("failed to parse response for '{ticker}': {e}"))
        })?;

        series_from_chart(name, ticker, body)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    adjclose: Option<Vec<AdjClose>>,
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Vec<Option<f64>>,
}

/// Convert a parsed chart response into a `Series`, dropping null and
/// non-finite entries.
pub(crate) fn series_from_chart(
    name: &str,
    ticker: &str,
    body: ChartResponse,
) -> Result<Series, PipelineError> {
    let result = body
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| {
            PipelineError::Download(format!("no chart data returned for '{ticker}'"))
        })?;

    let timestamps = result.timestamp.unwrap_or_default();
    let closes: &[Option<f64>] = match &result.indicators.adjclose {
        Some(adj) if !adj.is_empty() => adj[0].adjclose.as_slice(),
        _ => result
            .indicators
            .quote
            .first()
            .map(|q| q.close.as_slice())
            .unwrap_or(&[]),
    };

    let mut dates = Vec::new();
    let mut values = Vec::new();
    for (&ts, close) in timestamps.iter().zip(closes.iter()) {
        let Some(v) = close.filter(|v| v.is_finite()) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| {
                PipelineError::Download(format!("invalid timestamp {ts} for '{ticker}'"))
            })?
            .date_naive();
        // Intraday timestamps on the same trading day collapse to one
        // entry; keep the first.
        if dates.last() == Some(&date) {
            continue;
        }
        dates.push(date);
        values.push(v);
    }

    if dates.is_empty() {
        return Err(PipelineError::Download(format!(
            "no usable observations for '{ticker}'"
        )));
    }

    Series::new(name, dates, values)
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn adjusted_closes_are_preferred() {
        // 2020-01-02 and 2020-01-03, midnight UTC.
        let body = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1577923200,1578009600],
                "indicators":{
                    "quote":[{"close":[60.0,61.0]}],
                    "adjclose":[{"adjclose":[59.5,60.5]}]
                }
            }]}}"#,
        );

        let series = series_from_chart("Crude Oil", "BZ=F", body).unwrap();
        assert_eq!(series.values, vec![59.5, 60.5]);
        assert_eq!(
            series.dates[0],
            NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()
        );
    }

    #[test]
    fn falls_back_to_raw_closes() {
        let body = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1577923200],
                "indicators":{"quote":[{"close":[60.0]}]}
            }]}}"#,
        );

        let series = series_from_chart("Coal", "MTFZ24.NYM", body).unwrap();
        assert_eq!(series.values, vec![60.0]);
    }

    #[test]
    fn null_closes_are_dropped() {
        let body = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1577923200,1578009600,1578096000],
                "indicators":{"quote":[{"close":[60.0,null,62.0]}]}
            }]}}"#,
        );

        let series = series_from_chart("Natural Gas", "NG=F", body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.values, vec![60.0, 62.0]);
    }

    #[test]
    fn empty_result_is_a_download_error() {
        let body = parse(r#"{"chart":{"result":null}}"#);
        assert!(matches!(
            series_from_chart("Coal", "MTFZ24.NYM", body),
            Err(PipelineError::Download(_))
        ));

        let body = parse(
            r#"{"chart":{"result":[{
                "timestamp":[],
                "indicators":{"quote":[{"close":[]}]}
            }]}}"#,
        );
        assert!(matches!(
            series_from_chart("Coal", "MTFZ24.NYM", body),
            Err(PipelineError::Download(_))
        ));
    }

    #[test]
    fn same_day_timestamps_collapse() {
        // Two intraday stamps on 2020-01-02.
        let body = parse(
            r#"{"chart":{"result":[{
                "timestamp":[1577923200,1577959200],
                "indicators":{"quote":[{"close":[60.0,61.0]}]}
            }]}}"#,
        );

        let series = series_from_chart("Crude Oil", "BZ=F", body).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.values, vec![60.0]);
    }
}
