//! Monthly alignment
//!
//! Every series is resampled onto end-of-month dates with its own aggregation
//! rule, then the months present in every column are kept (inner join) and the
//! table is cut to the most recent `month_count` rows.

use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::indicators::{Aggregation, Indicator};
use crate::timeseries::TimeSeries;
use crate::window::Window;

/// Monthly values keyed by end-of-month date
pub type MonthlySeries = BTreeMap<NaiveDate, Decimal>;

/// Month-end rows where every column has a value.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    columns: Vec<Indicator>,
    rows: BTreeMap<NaiveDate, BTreeMap<Indicator, Decimal>>,
}

impl AlignedTable {
    /// Keep only the months present in every column
    pub fn inner_join(columns: BTreeMap<Indicator, MonthlySeries>) -> Self {
        let Some((_, first)) = columns.iter().next() else {
            return Self {
                columns: Vec::new(),
                rows: BTreeMap::new(),
            };
        };

        let rows = first
            .keys()
            .filter_map(|month_end| {
                columns
                    .iter()
                    .map(|(indicator, monthly)| {
                        monthly.get(month_end).map(|value| (*indicator, *value))
                    })
                    .collect::<Option<BTreeMap<_, _>>>()
                    .map(|row| (*month_end, row))
            })
            .collect();

        Self {
            columns: columns.keys().copied().collect(),
            rows,
        }
    }

    /// Drop all but the `count` most recent rows
    pub fn tail(mut self, count: usize) -> Self {
        while self.rows.len() > count {
            self.rows.pop_first();
        }
        self
    }

    /// Present columns in priority order
    pub fn columns(&self) -> &[Indicator] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn month_ends(&self) -> Vec<NaiveDate> {
        self.rows.keys().copied().collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDate, &BTreeMap<Indicator, Decimal>)> {
        self.rows.iter().map(|(date, row)| (*date, row))
    }

    /// Values of one column in date order; empty when the column is absent
    pub fn column(&self, indicator: Indicator) -> Vec<Decimal> {
        self.rows
            .values()
            .filter_map(|row| row.get(&indicator).copied())
            .collect()
    }
}

/// Last calendar day of the month containing `date`
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Collapse observations into one value per month. Months without any present
/// observation are left out.
pub fn resample(series: &TimeSeries, aggregation: Aggregation) -> MonthlySeries {
    let chunks = series.observed().chunk_by(|(date, _)| month_end(*date));

    let mut monthly = MonthlySeries::new();
    for (end, group) in &chunks {
        let values: Vec<Decimal> = group.map(|(_, value)| value).collect();
        if let Some(value) = aggregate(aggregation, &values) {
            monthly.insert(end, value);
        }
    }
    monthly
}

fn aggregate(aggregation: Aggregation, values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    match aggregation {
        Aggregation::Mean => {
            let sum: Decimal = values.iter().sum();
            Some(sum / Decimal::from(values.len()))
        }
        Aggregation::Sum => Some(values.iter().sum()),
        Aggregation::Last => values.last().copied(),
    }
}

/// Build the aligned table for `window`.
///
/// Market series lose the in-progress month (its year-month is not strictly
/// before today's). Empty series contribute no column.
pub fn align(
    series_by_name: &BTreeMap<Indicator, TimeSeries>,
    window: &Window,
    today: NaiveDate,
) -> Result<AlignedTable, PipelineError> {
    let current_month = (today.year(), today.month());
    let mut columns = BTreeMap::new();

    for (indicator, series) in series_by_name {
        let spec = indicator.spec();
        let mut monthly = resample(series, spec.aggregation);

        if spec.is_market() {
            monthly.retain(|end, _| (end.year(), end.month()) < current_month);
        }

        if monthly.is_empty() {
            warn!("{} has no monthly values, leaving it out of the table", indicator);
            continue;
        }
        debug!("{}: {} monthly values", indicator, monthly.len());
        columns.insert(*indicator, monthly);
    }

    let table = AlignedTable::inner_join(columns).tail(window.month_count as usize);
    if table.is_empty() {
        return Err(PipelineError::InsufficientData);
    }

    debug!(
        "Aligned {} months across {} indicators",
        table.len(),
        table.columns().len()
    );
    Ok(table)
}
