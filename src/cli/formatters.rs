//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::accumulate::ColumnKind;
use crate::error::PipelineError;
use crate::pipeline::Report;
use crate::utils::{format_number, format_percent, to_f64};
use crate::window::month_label;

/// Width of the bar area of the chart, in terminal cells
pub const CHART_WIDTH: usize = 40;

/// Format a report as a single JSON document (dashboard consumers)
pub fn format_report_json(report: &Report) -> String {
    #[derive(Serialize)]
    struct JsonRow {
        month: String,
        values: Vec<f64>,
    }

    #[derive(Serialize)]
    struct JsonBar {
        indicator: String,
        accumulated: f64,
    }

    #[derive(Serialize)]
    struct JsonReport {
        month_count: u32,
        start_date: String,
        columns: Vec<String>,
        rows: Vec<JsonRow>,
        chart: Vec<JsonBar>,
    }

    let columns = report.table.columns();
    let rows = report
        .table
        .rows()
        .iter()
        .map(|row| JsonRow {
            month: month_label(row.month_end),
            values: columns
                .iter()
                .zip(&row.values)
                .map(|(column, value)| to_f64(*value, column.decimals()))
                .collect(),
        })
        .collect();

    let chart = report
        .table
        .final_accumulated()
        .into_iter()
        .map(|(indicator, value)| JsonBar {
            indicator: indicator.label().to_string(),
            accumulated: to_f64(value, 4),
        })
        .collect();

    let json_report = JsonReport {
        month_count: report.window.month_count,
        start_date: report.window.start_date.format("%Y-%m-%d").to_string(),
        columns: columns.iter().map(|c| c.name()).collect(),
        rows,
        chart,
    };

    serde_json::to_string_pretty(&json_report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format the consolidated table: one row per month, observed values next to
/// their accumulated returns
pub fn format_report_table(report: &Report) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "\n{} Consolidated economic indicators\n\n",
        "📊".cyan().bold()
    ));

    let columns = report.table.columns();

    let mut builder = Builder::default();
    let mut header = vec!["Month".to_string()];
    header.extend(columns.iter().map(|c| c.name()));
    builder.push_record(header);

    for row in report.table.rows() {
        let mut record = vec![month_label(row.month_end)];
        for (column, value) in columns.iter().zip(&row.values) {
            let text = format_number(*value, column.decimals());
            let cell = match column.kind {
                ColumnKind::Observed => text,
                ColumnKind::Accumulated if *value < Decimal::ZERO => text.red().to_string(),
                ColumnKind::Accumulated => text.green().to_string(),
            };
            record.push(cell);
        }
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    // Right-align every numeric column
    table.modify(Columns::new(1..), Alignment::right());

    output.push_str(&table.to_string());
    output.push('\n');
    output
}

/// Horizontal bar chart of the final accumulated values, sorted ascending.
///
/// Negative bars grow left of the axis, positive ones right of it.
pub fn format_chart(report: &Report, width: usize) -> String {
    let finals = report.table.final_accumulated();
    let mut output = format!(
        "\n{} Accumulated indicators over the last {} months\n\n",
        "📈".cyan().bold(),
        report.window.month_count
    );

    if finals.is_empty() {
        return output;
    }

    let as_f64 = |v: &Decimal| v.to_f64().unwrap_or(0.0);
    let max_neg = finals
        .iter()
        .map(|(_, v)| -as_f64(v))
        .fold(0.0_f64, f64::max);
    let max_pos = finals.iter().map(|(_, v)| as_f64(v)).fold(0.0_f64, f64::max);
    let span = max_neg + max_pos;

    let (neg_cells, pos_cells, scale) = if span > 0.0 {
        let neg_cells = ((max_neg / span) * width as f64).round() as usize;
        (neg_cells, width.saturating_sub(neg_cells), width as f64 / span)
    } else {
        (0, width, 0.0)
    };

    let label_width = finals
        .iter()
        .map(|(indicator, _)| indicator.label().width())
        .max()
        .unwrap_or(0);

    for (indicator, value) in &finals {
        let magnitude = as_f64(value).abs();
        let cells = ((magnitude * scale).round() as usize).min(width);
        let label = indicator.label();
        let padding = " ".repeat(label_width - label.width());

        let (left, right) = if *value < Decimal::ZERO {
            let cells = cells.min(neg_cells);
            let bar = "█".repeat(cells).red().to_string();
            (
                format!("{}{}", " ".repeat(neg_cells - cells), bar),
                " ".repeat(pos_cells),
            )
        } else {
            let cells = cells.min(pos_cells);
            let bar = "█".repeat(cells).green().to_string();
            (
                " ".repeat(neg_cells),
                format!("{}{}", bar, " ".repeat(pos_cells - cells)),
            )
        };

        output.push_str(&format!(
            "{}{} {}│{} {}\n",
            label.bold(),
            padding,
            left,
            right,
            format_percent(*value)
        ));
    }

    output
}

/// Blocking warning shown when a run cannot produce a report
pub fn format_warning(err: &PipelineError) -> String {
    let hint = match err {
        PipelineError::InvalidInput(_) => {
            "Use a month count (12, 24, ..., 120) or a start month like 'jun/24'"
        }
        PipelineError::InsufficientData => {
            "The data sources returned no overlapping months; try again later"
        }
    };
    format!("{} {}\n  {}\n", "⚠".yellow().bold(), err, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::{AlignedTable, MonthlySeries};
    use crate::accumulate::accumulate;
    use crate::indicators::Indicator;
    use crate::window::Window;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_report() -> Report {
        let months = [d(2024, 6, 30), d(2024, 7, 31)];
        let series = |values: [Decimal; 2]| -> MonthlySeries { months.into_iter().zip(values).collect() };

        let mut columns = BTreeMap::new();
        columns.insert(Indicator::Ipca, series([dec!(0.21), dec!(0.38)]));
        columns.insert(Indicator::Ibovespa, series([dec!(123906.55), dec!(127651.6)]));
        columns.insert(Indicator::Dolar, series([dec!(5.5), dec!(5.445)]));

        Report {
            window: Window {
                month_count: 2,
                start_date: d(2024, 6, 1),
            },
            table: accumulate(&AlignedTable::inner_join(columns)),
        }
    }

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_table_has_month_labels_and_precision() {
        no_color();
        let table = format_report_table(&sample_report());
        assert!(table.contains("Consolidated economic indicators"));
        assert!(table.contains("jun/24"));
        assert!(table.contains("jul/24"));
        assert!(table.contains("IPCA-accumulated"));
        // Ibovespa level keeps two decimals, rates keep four
        assert!(table.contains("127,651.60"));
        assert!(table.contains("0.3800"));
        assert!(table.contains("0.5908"));
    }

    #[test]
    fn test_chart_is_sorted_ascending_and_annotated() {
        no_color();
        let chart = format_chart(&sample_report(), CHART_WIDTH);
        assert!(chart.contains("last 2 months"));

        let lines: Vec<&str> = chart.lines().filter(|l| l.contains('│')).collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("DOLAR"));
        assert!(lines[0].ends_with("-1.00%"));
        assert!(lines[1].starts_with("IPCA"));
        assert!(lines[2].starts_with("IBOV"));
        assert!(lines[2].ends_with("3.02%"));
    }

    #[test]
    fn test_json_report() {
        let json = format_report_json(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["month_count"], 2);
        assert_eq!(value["start_date"], "2024-06-01");
        assert_eq!(value["columns"][0], "IPCA");
        assert_eq!(value["columns"][1], "IPCA-accumulated");
        assert_eq!(value["rows"][1]["month"], "jul/24");
        assert_eq!(value["chart"][0]["indicator"], "DOLAR");
        assert_eq!(value["chart"][0]["accumulated"], -1.0);
    }

    #[test]
    fn test_warning_messages() {
        no_color();
        let msg = format_warning(&PipelineError::InsufficientData);
        assert!(msg.contains("insufficient data"));

        let msg = format_warning(&PipelineError::InvalidInput(
            crate::error::WindowError::Unrecognized("13".to_string()),
        ));
        assert!(msg.contains("invalid input"));
        assert!(msg.contains("jun/24"));
    }
}
