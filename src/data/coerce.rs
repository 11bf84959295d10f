//! Lenient conversions from spreadsheet cells: numbers, calendar dates and
//! `"<MonthName> <Year>"` labels. None of these ever fail; bad input becomes
//! `0` or `None` and the caller decides what that means.

use chrono::{NaiveDate, NaiveDateTime};

use super::model::CellValue;

/// Full English month names, in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Date layouts seen in sheet exports, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Convert a cell to a number. Empty or unparsable cells yield `0`, as do
/// non-finite numbers, so the result is always safe to aggregate.
pub fn coerce_number(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(v) if v.is_finite() => *v,
        CellValue::Number(_) | CellValue::Empty => 0.0,
        CellValue::Text(text) => coerce_text(text),
    }
}

/// Text flavour of [`coerce_number`]: drops thousands separators, then reads
/// the leading decimal literal (`"1,234"` → 1234, `"85%"` → 85, `"abc"` → 0).
pub fn coerce_text(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let cleaned = text.replace(',', "");
    leading_float(&cleaned).unwrap_or(0.0)
}

/// Parse the longest decimal literal at the start of `text`, ignoring
/// leading whitespace and any trailing garbage.
fn leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_run = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_digits = digits_run(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_run(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_run(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse a session date cell. Returns `None` for blank or unrecognised text.
///
/// Timestamps (`2024-03-15T09:30:00`, `2024-03-15 09:30`) are reduced to
/// their calendar date.
pub fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }

    if let Ok(stamp) = text.parse::<NaiveDateTime>() {
        return Some(stamp.date());
    }

    // ISO date followed by a time part we don't care about.
    match (text.get(..10), text.as_bytes().get(10)) {
        (Some(head), Some(b'T' | b' ')) => NaiveDate::parse_from_str(head, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// Parse a `"<MonthName> <Year>"` label to the first day of that month.
///
/// The month must be one of [`MONTH_NAMES`] spelled exactly; anything else
/// (abbreviations, extra words, missing year) yields `None`.
pub fn parse_month_year(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split_whitespace();
    let (month_name, year) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let month_index = MONTH_NAMES.iter().position(|name| *name == month_name)?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month_index as u32 + 1, 1)
}
