//! Accumulated returns over the aligned window
//!
//! Rate indicators (monthly % rates) compound: `(prod(1 + r/100) - 1) * 100`.
//! Level indicators (prices, FX) are rebased on the first row of the window:
//! `(v / v0 - 1) * 100`.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::aligner::AlignedTable;
use crate::indicators::{Accumulation, Indicator};

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Observed,
    Accumulated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub indicator: Indicator,
    pub kind: ColumnKind,
}

impl Column {
    pub fn observed(indicator: Indicator) -> Self {
        Self {
            indicator,
            kind: ColumnKind::Observed,
        }
    }

    pub fn accumulated(indicator: Indicator) -> Self {
        Self {
            indicator,
            kind: ColumnKind::Accumulated,
        }
    }

    /// `IPCA` for observed values, `IPCA-accumulated` for the derived column
    pub fn name(&self) -> String {
        match self.kind {
            ColumnKind::Observed => self.indicator.label().to_string(),
            ColumnKind::Accumulated => format!("{}-accumulated", self.indicator.label()),
        }
    }

    /// Display precision
    pub fn decimals(&self) -> u32 {
        match self.kind {
            ColumnKind::Observed => self.indicator.spec().decimals,
            ColumnKind::Accumulated => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedRow {
    pub month_end: NaiveDate,
    /// One value per column, in column order
    pub values: Vec<Decimal>,
}

/// Aligned values interleaved with their accumulated returns.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedTable {
    columns: Vec<Column>,
    rows: Vec<AccumulatedRow>,
}

impl AccumulatedTable {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[AccumulatedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of `column` in date order; empty when the column is absent
    pub fn column_values(&self, column: Column) -> Vec<Decimal> {
        let Some(idx) = self.columns.iter().position(|c| *c == column) else {
            return Vec::new();
        };
        self.rows.iter().map(|row| row.values[idx]).collect()
    }

    /// Final accumulated value of every indicator, sorted ascending
    pub fn final_accumulated(&self) -> Vec<(Indicator, Decimal)> {
        let Some(last) = self.rows.last() else {
            return Vec::new();
        };

        let mut finals: Vec<(Indicator, Decimal)> = self
            .columns
            .iter()
            .zip(&last.values)
            .filter(|(column, _)| column.kind == ColumnKind::Accumulated)
            .map(|(column, value)| (column.indicator, *value))
            .collect();
        finals.sort_by(|a, b| a.1.cmp(&b.1));
        finals
    }
}

/// Derive the accumulated column of every indicator in `table`.
///
/// Expects a non-empty table; an empty one yields an empty result.
pub fn accumulate(table: &AlignedTable) -> AccumulatedTable {
    let mut columns = Vec::with_capacity(table.columns().len() * 2);
    let mut data: Vec<Vec<Decimal>> = Vec::with_capacity(table.columns().len() * 2);

    for &indicator in table.columns() {
        let observed = table.column(indicator);
        let derived = match indicator.spec().accumulation {
            Accumulation::CompoundingRate => compound(&observed),
            Accumulation::RebasedLevel => rebase(&observed),
        };

        columns.push(Column::observed(indicator));
        data.push(observed);
        columns.push(Column::accumulated(indicator));
        data.push(derived);
    }

    let rows = table
        .month_ends()
        .into_iter()
        .enumerate()
        .map(|(i, month_end)| AccumulatedRow {
            month_end,
            values: data.iter().map(|column| column[i]).collect(),
        })
        .collect();

    AccumulatedTable { columns, rows }
}

/// Running compounded return of per-period percentage rates
pub fn compound(rates: &[Decimal]) -> Vec<Decimal> {
    let mut factor = Decimal::ONE;
    rates
        .iter()
        .map(|rate| {
            factor *= Decimal::ONE + rate / ONE_HUNDRED;
            (factor - Decimal::ONE) * ONE_HUNDRED
        })
        .collect()
}

/// Percent change of every level against the first one. A zero base rebases to zero.
pub fn rebase(levels: &[Decimal]) -> Vec<Decimal> {
    let Some(&base) = levels.first() else {
        return Vec::new();
    };
    if base.is_zero() {
        return vec![Decimal::ZERO; levels.len()];
    }
    levels
        .iter()
        .map(|level| (level / base - Decimal::ONE) * ONE_HUNDRED)
        .collect()
}
