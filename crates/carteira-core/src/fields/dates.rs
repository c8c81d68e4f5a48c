//! Date parsing for Brazilian documents.

use chrono::{Datelike, NaiveDate};

/// Oldest year accepted on a document.
const MIN_YEAR: i32 = 1900;
/// Newest year accepted on a document.
const MAX_YEAR: i32 = 2100;

/// Parse a single date token.
///
/// Accepts `DD/MM/YYYY` and `DD/MMM/YYYY` where `MMM` is a three-letter
/// Portuguese month code (`JAN`, `FEV`, ... `DEZ`, any case). `/`, `.` and
/// `-` are accepted as separators as long as both are the same. Two-digit
/// years, unknown month codes and impossible days are rejected rather than
/// guessed.
pub fn parse_local_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();
    let sep = token.chars().find(|c| matches!(c, '/' | '.' | '-'))?;
    let parts: Vec<&str> = token.split(sep).collect();

    let [day, month, year] = parts.as_slice() else {
        return None;
    };

    if day.is_empty() || day.len() > 2 || !day.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let month = parse_month(month)?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format a date as ISO `YYYY-MM-DD`.
pub fn format_date_iso(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

fn parse_month(month: &str) -> Option<u32> {
    if month.chars().all(|c| c.is_ascii_digit()) {
        if month.is_empty() || month.len() > 2 {
            return None;
        }
        return month.parse().ok().filter(|m| (1..=12).contains(m));
    }

    month_code_to_number(month)
}

fn month_code_to_number(code: &str) -> Option<u32> {
    let month = match code.to_uppercase().as_str() {
        "JAN" => 1,
        "FEV" => 2,
        "MAR" => 3,
        "ABR" => 4,
        "MAI" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AGO" => 8,
        "SET" => 9,
        "OUT" => 10,
        "NOV" => 11,
        "DEZ" => 12,
        _ => return None,
    };
    Some(month)
}
