use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::timeseries::TimeSeries;

/// Yahoo Finance chart response
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[allow(dead_code)]
    symbol: String,
    /// Exchange offset from UTC in seconds; session timestamps are shifted by it
    /// so a quote lands on its trading day
    #[serde(rename = "gmtoffset")]
    gmt_offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> String {
        // Start of the first day to the end of the last one, in UTC
        let from_timestamp = from.and_hms_opt(0, 0, 0).map(|t| t.and_utc().timestamp());
        let to_timestamp = to.and_hms_opt(23, 59, 59).map(|t| t.and_utc().timestamp());

        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            encode_symbol(symbol),
            from_timestamp.unwrap_or_default(),
            to_timestamp.unwrap_or_default()
        )
    }

    /// Fetch daily closes for `symbol` between `from` and `to`
    pub async fn fetch_closes(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<TimeSeries, SourceError> {
        let url = self.chart_url(symbol, from, to);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let data: YahooChartResponse = response.json().await?;
        let series = parse_chart(data)?;
        if series.is_empty() {
            return Err(SourceError::Empty { from, to });
        }

        debug!("Yahoo {}: {} daily closes", symbol, series.len());
        Ok(series)
    }
}

/// Turn a chart payload into a series of daily closes.
///
/// A null close stays in the series as a missing value.
pub fn parse_chart(data: YahooChartResponse) -> Result<TimeSeries, SourceError> {
    if let Some(error) = data.chart.error {
        return Err(SourceError::Payload(format!(
            "{} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(TimeSeries::empty());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();
    let offset = result.meta.gmt_offset.unwrap_or(0);

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let date = DateTime::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| SourceError::Payload(format!("invalid timestamp {}", timestamp)))?
            .date_naive();

        let close = closes
            .get(i)
            .copied()
            .flatten()
            .and_then(Decimal::from_f64_retain);

        points.push((date, close));
    }

    Ok(points.into_iter().collect())
}

fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E").replace('=', "%3D")
}
