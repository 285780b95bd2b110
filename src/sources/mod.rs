// Remote sources - SGS (Central Bank) and Yahoo Finance clients

pub mod bcb;
pub mod yahoo;

use anyhow::Result;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Settings;
use crate::indicators::{SeriesSpec, Source};
use crate::timeseries::TimeSeries;
use bcb::BcbClient;
use yahoo::YahooClient;

/// Fetches one indicator series at a time.
///
/// This is where remote failures stop: `fetch` logs them and hands back an
/// empty series, so the pipeline only ever sees data or its absence.
pub struct SeriesFetcher {
    bcb: BcbClient,
    yahoo: YahooClient,
}

impl SeriesFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder().user_agent(settings.user_agent.clone());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            bcb: BcbClient::new(client.clone(), &settings.bcb_base_url),
            yahoo: YahooClient::new(client, &settings.yahoo_base_url),
        })
    }

    /// Fetch `spec` over `[from, to]`; any failure yields an empty series
    pub async fn fetch(&self, spec: &SeriesSpec, from: NaiveDate, to: NaiveDate) -> TimeSeries {
        let result = match spec.source {
            Source::Sgs(code) => {
                info!("Fetching {} (SGS {}) from {} to {}", spec.indicator, code, from, to);
                self.bcb.fetch_series(code, from, to).await
            }
            Source::Yahoo(symbol) => {
                info!("Fetching {} ({}) from {} to {}", spec.indicator, symbol, from, to);
                self.yahoo.fetch_closes(symbol, from, to).await
            }
        };

        match result {
            Ok(series) => series,
            Err(e) => {
                warn!("{} unavailable, continuing without it: {}", spec.indicator, e);
                TimeSeries::empty()
            }
        }
    }
}
