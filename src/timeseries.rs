use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Dated observations of one indicator.
///
/// Dates are unique and ordered. An entry may hold `None` when the source
/// reported the date but its value could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: BTreeMap<NaiveDate, Option<Decimal>>,
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// All entries, missing values included
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<Decimal>)> + '_ {
        self.points.iter().map(|(date, value)| (*date, *value))
    }

    /// Entries with a value, in date order
    pub fn observed(&self) -> impl Iterator<Item = (NaiveDate, Decimal)> + '_ {
        self.points
            .iter()
            .filter_map(|(date, value)| value.map(|v| (*date, v)))
    }

    pub fn get(&self, date: NaiveDate) -> Option<Decimal> {
        self.points.get(&date).copied().flatten()
    }
}

impl FromIterator<(NaiveDate, Option<Decimal>)> for TimeSeries {
    /// Later entries for the same date replace earlier ones
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Option<Decimal>)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(NaiveDate, Decimal)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: I) -> Self {
        iter.into_iter().map(|(date, v)| (date, Some(v))).collect()
    }
}
