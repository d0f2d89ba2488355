//! Presentation formats for customer dates.
//!
//! Calendar dates go out as `DD - MMM - YYYY` (`05 - MAR - 2024`) and the
//! creation timestamp as `HH:MM:SS`. Parsing accepts the same display form
//! back so that an exported sheet can be imported again.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

pub const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// `None` stays `None`; it never becomes a formatted empty string.
pub fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| {
        format!(
            "{:02} - {} - {}",
            d.day(),
            MONTHS[d.month0() as usize],
            d.year()
        )
    })
}

pub fn format_time(ts: Option<NaiveDateTime>) -> Option<String> {
    ts.map(|t| format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second()))
}

/// Parses a user supplied date. Blank input is `Ok(None)`.
///
/// Accepted: `2024-03-05`, `2024-03-05T10:00:00`, `05 - MAR - 2024`,
/// `05-Mar-2024` and `05/03/2024` (day first).
pub fn parse_date(input: &str) -> Result<Option<NaiveDate>, String> {
    let s = input.trim();
    if s.is_empty() {
        return Ok(None);
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Some(d));
    }
    if let Some((day_part, _)) = s.split_once('T')
        && let Ok(d) = NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
    {
        return Ok(Some(d));
    }
    if let Some(d) = parse_display_date(s) {
        return Ok(Some(d));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Ok(Some(d));
    }

    Err(format!("Invalid date: {s}"))
}

fn parse_display_date(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split('-').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return None;
    };
    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month))?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month as u32 + 1, day.parse().ok()?)
}

/// Converts an Excel serial day number (1900 date system) to a date.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    // Day 0 is 1899-12-30 once Excel's phantom 1900-02-29 is accounted for.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))
}
