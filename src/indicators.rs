//! Indicator registry
//!
//! Static metadata for the seven tracked series: where each one is fetched
//! from, how daily observations collapse into a month, and how the monthly
//! values accumulate over the window.

use std::fmt;

/// Tracked indicators.
///
/// Variant order is the display priority: rate indicators first, then the
/// market levels. `Ord` is derived so maps keyed by `Indicator` iterate in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Indicator {
    Igpm,
    Incc,
    Ipca,
    Cdi,
    Poupanca,
    Dolar,
    Ibovespa,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::Igpm,
        Indicator::Incc,
        Indicator::Ipca,
        Indicator::Cdi,
        Indicator::Poupanca,
        Indicator::Dolar,
        Indicator::Ibovespa,
    ];

    /// Column label used in tables, charts and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Igpm => "IGPM",
            Indicator::Incc => "INCC",
            Indicator::Ipca => "IPCA",
            Indicator::Cdi => "CDI",
            Indicator::Poupanca => "POUP",
            Indicator::Dolar => "DOLAR",
            Indicator::Ibovespa => "IBOV",
        }
    }

    pub fn spec(&self) -> SeriesSpec {
        match self {
            Indicator::Igpm => SeriesSpec::rate(*self, 189, Aggregation::Mean),
            Indicator::Incc => SeriesSpec::rate(*self, 192, Aggregation::Mean),
            Indicator::Ipca => SeriesSpec::rate(*self, 433, Aggregation::Mean),
            Indicator::Cdi => SeriesSpec::rate(*self, 4391, Aggregation::Sum),
            Indicator::Poupanca => SeriesSpec::rate(*self, 196, Aggregation::Sum),
            Indicator::Dolar => SeriesSpec::market(*self, "USDBRL=X", 4),
            Indicator::Ibovespa => SeriesSpec::market(*self, "^BVSP", 2),
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a series is fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Central Bank SGS series code
    Sgs(u32),
    /// Yahoo Finance symbol; only the daily close is used
    Yahoo(&'static str),
}

/// How the observations of one calendar month collapse into a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    Sum,
    Last,
}

/// How monthly values turn into a return since the first month of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Values are per-period percentage rates, compounded
    CompoundingRate,
    /// Values are price levels, rebased on the first row
    RebasedLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesSpec {
    pub indicator: Indicator,
    pub source: Source,
    pub aggregation: Aggregation,
    pub accumulation: Accumulation,
    /// Decimal places shown for the observed column
    pub decimals: u32,
}

impl SeriesSpec {
    const fn rate(indicator: Indicator, code: u32, aggregation: Aggregation) -> Self {
        Self {
            indicator,
            source: Source::Sgs(code),
            aggregation,
            accumulation: Accumulation::CompoundingRate,
            decimals: 4,
        }
    }

    const fn market(indicator: Indicator, symbol: &'static str, decimals: u32) -> Self {
        Self {
            indicator,
            source: Source::Yahoo(symbol),
            aggregation: Aggregation::Last,
            accumulation: Accumulation::RebasedLevel,
            decimals,
        }
    }

    /// Market series carry a partial current month that must not be aligned
    pub fn is_market(&self) -> bool {
        matches!(self.source, Source::Yahoo(_))
    }
}

/// Specs of every tracked indicator, in priority order
pub fn registry() -> Vec<SeriesSpec> {
    Indicator::ALL.iter().map(Indicator::spec).collect()
}
