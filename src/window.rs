//! Trailing window resolution
//!
//! A window is either one of the fixed month counts or a start month typed as
//! `mmm/yy` (English abbreviations, e.g. `jun/24`).

use chrono::{Datelike, Months, NaiveDate};

use crate::error::WindowError;

/// Month counts accepted as a bare number
pub const ALLOWED_MONTH_COUNTS: [u32; 10] = [12, 24, 36, 48, 60, 72, 84, 96, 108, 120];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub month_count: u32,
    pub start_date: NaiveDate,
}

/// Resolve user input into a window ending at `today`.
pub fn resolve(input: &str, today: NaiveDate) -> Result<Window, WindowError> {
    let normalized = input.trim().to_lowercase();

    // Bare digits only; `u32::from_str` would also take a leading `+`
    let is_count = !normalized.is_empty() && normalized.chars().all(|c| c.is_ascii_digit());
    if let Some(count) = normalized.parse::<u32>().ok().filter(|_| is_count) {
        if ALLOWED_MONTH_COUNTS.contains(&count) {
            let start_date = today
                .checked_sub_months(Months::new(count + 1))
                .ok_or_else(|| WindowError::Unrecognized(input.trim().to_string()))?;
            return Ok(Window {
                month_count: count,
                start_date,
            });
        }
    }

    let start_date = parse_month_token(&normalized)
        .ok_or_else(|| WindowError::Unrecognized(input.trim().to_string()))?;

    let months = (today.year() - start_date.year()) * 12 + today.month() as i32
        - start_date.month() as i32;
    if months < 1 {
        return Err(WindowError::NonPositive {
            input: normalized,
            today_month: month_label(today),
        });
    }

    Ok(Window {
        month_count: months as u32,
        start_date,
    })
}

/// Parse `mmm/yy` into the first day of that month.
///
/// Two-digit years follow the POSIX pivot: 69-99 are 19xx, 00-68 are 20xx.
pub fn parse_month_token(token: &str) -> Option<NaiveDate> {
    let (month_part, year_part) = token.split_once('/')?;

    let month = MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| *abbr == month_part)? as u32
        + 1;

    if year_part.len() != 2 || !year_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = year_part.parse().ok()?;
    let year = if yy >= 69 { 1900 + yy } else { 2000 + yy };

    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Lowercase `mmm/yy` label of the month containing `date`
pub fn month_label(date: NaiveDate) -> String {
    format!(
        "{}/{:02}",
        MONTH_ABBREVIATIONS[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}
