//! Central Bank of Brazil SGS client
//!
//! `GET /dados/serie/bcdata.sgs.{code}/dados?formato=json&dataInicial=..&dataFinal=..`
//! answers with `[{"data": "dd/mm/yyyy", "valor": "0,42"}, ...]`. Dates are
//! day-first and values may use a decimal comma; both quirks stay in this file.

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::debug;

use crate::error::SourceError;
use crate::timeseries::TimeSeries;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Deserialize)]
struct SgsObservation {
    data: String,
    valor: String,
}

pub struct BcbClient {
    client: Client,
    base_url: String,
}

impl BcbClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn series_url(&self, code: u32, from: NaiveDate, to: NaiveDate) -> String {
        format!(
            "{}/dados/serie/bcdata.sgs.{}/dados?formato=json&dataInicial={}&dataFinal={}",
            self.base_url,
            code,
            from.format(DATE_FORMAT),
            to.format(DATE_FORMAT)
        )
    }

    pub async fn fetch_series(
        &self,
        code: u32,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<TimeSeries, SourceError> {
        let url = self.series_url(code, from, to);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let body = response.text().await?;
        let series = parse_observations(&body)?;
        if series.is_empty() {
            return Err(SourceError::Empty { from, to });
        }

        debug!("SGS {}: {} observations", code, series.len());
        Ok(series)
    }
}

/// Parse an SGS JSON payload.
///
/// An empty body is an empty series. Observations with an unreadable date are
/// skipped; unreadable values are kept as missing.
pub fn parse_observations(body: &str) -> Result<TimeSeries, SourceError> {
    if body.trim().is_empty() {
        return Ok(TimeSeries::empty());
    }

    let observations: Vec<SgsObservation> =
        serde_json::from_str(body).map_err(|e| SourceError::Payload(e.to_string()))?;

    let series = observations
        .into_iter()
        .filter_map(|obs| match NaiveDate::parse_from_str(obs.data.trim(), DATE_FORMAT) {
            Ok(date) => Some((date, parse_decimal_comma(&obs.valor))),
            Err(_) => {
                debug!("Skipping SGS observation with invalid date '{}'", obs.data);
                None
            }
        })
        .collect();

    Ok(series)
}

/// `"0,42"` and `"0.42"` both read as 0.42; anything else is missing
pub fn parse_decimal_comma(value: &str) -> Option<Decimal> {
    Decimal::from_str(&value.trim().replace(',', ".")).ok()
}
