//! Report pipeline: window -> fetch -> align -> accumulate

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

use crate::accumulate::{accumulate, AccumulatedTable};
use crate::aligner::align;
use crate::error::PipelineError;
use crate::indicators::{registry, Indicator};
use crate::sources::SeriesFetcher;
use crate::timeseries::TimeSeries;
use crate::window::{resolve, Window};

/// Everything a shell needs to render one run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub window: Window,
    pub table: AccumulatedTable,
}

/// Typed progress events for UI rendering
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    Fetching {
        indicator: Indicator,
        index: usize,
        total: usize,
    },
    Fetched {
        indicator: Indicator,
        observations: usize,
    },
    Aligning,
}

/// Run the whole pipeline for a user-supplied window string
pub async fn run(
    fetcher: &SeriesFetcher,
    input: &str,
    today: NaiveDate,
) -> Result<Report, PipelineError> {
    run_with_progress(fetcher, input, today, |_| {}).await
}

pub async fn run_with_progress<F>(
    fetcher: &SeriesFetcher,
    input: &str,
    today: NaiveDate,
    mut on_event: F,
) -> Result<Report, PipelineError>
where
    F: FnMut(ProgressEvent),
{
    // Invalid input stops here, before any request goes out
    let window = resolve(input, today)?;
    info!(
        "Window: {} months starting {}",
        window.month_count, window.start_date
    );

    let series = fetch_all(fetcher, &window, today, &mut on_event).await;

    on_event(ProgressEvent::Aligning);
    build_report(&series, window, today)
}

/// Fetch every registry series over `[window.start_date, today]`, one after another
pub async fn fetch_all<F>(
    fetcher: &SeriesFetcher,
    window: &Window,
    today: NaiveDate,
    on_event: &mut F,
) -> BTreeMap<Indicator, TimeSeries>
where
    F: FnMut(ProgressEvent),
{
    let specs = registry();
    let total = specs.len();
    let mut series_by_name = BTreeMap::new();

    for (index, spec) in specs.iter().enumerate() {
        on_event(ProgressEvent::Fetching {
            indicator: spec.indicator,
            index,
            total,
        });
        let series = fetcher.fetch(spec, window.start_date, today).await;
        on_event(ProgressEvent::Fetched {
            indicator: spec.indicator,
            observations: series.len(),
        });
        series_by_name.insert(spec.indicator, series);
    }

    series_by_name
}

/// Align and accumulate already-fetched series
pub fn build_report(
    series_by_name: &BTreeMap<Indicator, TimeSeries>,
    window: Window,
    today: NaiveDate,
) -> Result<Report, PipelineError> {
    let aligned = align(series_by_name, &window, today)?;
    Ok(Report {
        window,
        table: accumulate(&aligned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulate::Column;
    use crate::aligner::month_end;
    use crate::config::Settings;
    use chrono::Months;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn offline_fetcher() -> SeriesFetcher {
        let settings = Settings {
            bcb_base_url: "http://127.0.0.1:9".to_string(),
            yahoo_base_url: "http://127.0.0.1:9".to_string(),
            ..Settings::default()
        };
        SeriesFetcher::new(&settings).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_emits_no_events() {
        let mut events = Vec::new();
        let result = run_with_progress(&offline_fetcher(), "13", d(2026, 10, 19), |ev| {
            events.push(ev)
        })
        .await;

        assert!(matches!(result, Err(ref e) if e.is_invalid_input()));
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_all_sources_down_is_insufficient() {
        let mut events = Vec::new();
        let result = run_with_progress(&offline_fetcher(), "12", d(2026, 10, 19), |ev| {
            events.push(ev)
        })
        .await;

        assert_eq!(result, Err(PipelineError::InsufficientData));
        assert_eq!(events.len(), 7 * 2 + 1);
        assert_eq!(events.last(), Some(&ProgressEvent::Aligning));
    }

    #[tokio::test]
    async fn test_run_against_live_sources() {
        use mockito::Matcher;

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/dados/serie/".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"data": "03/06/2024", "valor": "0,50"}]"#)
            .create_async()
            .await;
        // 2024-06-03 and 2024-06-28, 13:00 UTC
        server
            .mock("GET", Matcher::Regex(r"^/v8/finance/chart/".to_string()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"chart": {"result": [{
                    "meta": {"symbol": "X", "gmtoffset": -10800},
                    "timestamp": [1717419600, 1719579600],
                    "indicators": {"quote": [{"close": [100.0, 110.0]}]}
                }], "error": null}}"#,
            )
            .create_async()
            .await;

        let settings = Settings {
            bcb_base_url: server.url(),
            yahoo_base_url: server.url(),
            ..Settings::default()
        };
        let fetcher = SeriesFetcher::new(&settings).unwrap();

        let report = run(&fetcher, "jun/24", d(2024, 7, 15)).await.unwrap();
        assert_eq!(report.window.month_count, 1);
        assert_eq!(report.table.len(), 1);
        assert_eq!(report.table.columns().len(), 14);
        assert_eq!(
            report.table.column_values(Column::accumulated(Indicator::Cdi)),
            vec![dec!(0.5)]
        );
        assert_eq!(
            report.table.column_values(Column::observed(Indicator::Ibovespa)),
            vec![dec!(110)]
        );
    }

    #[test]
    fn test_build_report() {
        let today = d(2026, 10, 19);
        let window = resolve("12", today).unwrap();

        let first = d(2025, 8, 1);
        let rates: TimeSeries = (0..15)
            .map(|i| (first.checked_add_months(Months::new(i)).unwrap(), dec!(1)))
            .collect();
        let levels: TimeSeries = (0..15)
            .map(|i| {
                let date = first.checked_add_months(Months::new(i)).unwrap();
                (month_end(date), dec!(100) + Decimal::from(i))
            })
            .collect();

        let mut series = BTreeMap::new();
        series.insert(Indicator::Cdi, rates);
        series.insert(Indicator::Ibovespa, levels);

        let report = build_report(&series, window, today).unwrap();
        assert_eq!(report.table.len(), 12);
        // Ibovespa stops at September 2026, so the window ends there
        assert_eq!(report.table.rows().last().unwrap().month_end, d(2026, 9, 30));
        assert_eq!(report.table.rows()[0].month_end, d(2025, 10, 31));
        assert_eq!(
            report.table.column_values(Column::accumulated(Indicator::Ibovespa))[0],
            dec!(0)
        );
    }
}
