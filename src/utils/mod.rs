//! Utility functions for formatting indicator values
//!
//! Centralized number formatting so the table, the chart and the JSON view
//! all round the same way.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round half away from zero to `decimals` places
pub fn round(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with grouping and fixed precision: "1,234.5678"
///
/// - Thousands separator: `,` (comma)
/// - Decimal separator: `.` (period)
///
/// # Examples
/// ```
/// use indicadores::utils::format_number;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_number(dec!(127752.456), 2), "127,752.46");
/// assert_eq!(format_number(dec!(1234.5), 4), "1,234.5000");
/// ```
pub fn format_number(value: Decimal, decimals: u32) -> String {
    let rounded = round(value, decimals);
    let is_negative = rounded < Decimal::ZERO;

    let formatted = format!("{:.*}", decimals as usize, rounded.abs());
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };

    // Add thousands separators (,) to integer part
    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    match decimal_part {
        Some(frac) => format!("{}{}.{}", sign, with_separators, frac),
        None => format!("{}{}", sign, with_separators),
    }
}

/// Percentage label used on chart bars: "12.34%"
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", format_number(value, 2))
}

/// Lossy conversion for JSON output, rounded to `decimals` places
pub fn to_f64(value: Decimal, decimals: u32) -> f64 {
    round(value, decimals).to_f64().unwrap_or(f64::NAN)
}
