//! Date resolution across the many textual forms the sheets use.
//!
//! The same logical date can show up as a gviz serial wrapper
//! (`Date(2024,0,15)`), a numeric `15/01/2024` or `2024-01-15`, a header
//! label like `Senin, 15/01/2024` or `15 Jan 2024`, or a form timestamp.
//! Everything resolves to a plain calendar date; time of day is discarded.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::clean_text;

static SERIAL_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Date\((\d{4}),\s*(\d{1,2}),\s*(\d{1,2})").expect("Invalid serial date regex")
});

static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,4})[/-](\d{1,2})[/-](\d{1,4})$").expect("Invalid numeric date regex")
});

const WEEKDAYS_ID: [&str; 7] = [
    "Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu",
];

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_ID_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

fn month_from_abbrev(text: &str) -> Option<u32> {
    let key: String = text.to_lowercase().chars().take(3).collect();
    let month = match key.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" | "mei" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" | "agu" | "agt" => 8,
        "sep" => 9,
        "oct" | "okt" => 10,
        "nov" => 11,
        "dec" | "des" => 12,
        _ => return None,
    };
    Some(month)
}

fn parse_serial(text: &str) -> Option<NaiveDate> {
    let caps = SERIAL_DATE_RE.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    // The wrapper carries a zero-based month
    NaiveDate::from_ymd_opt(year, month + 1, day)
}

fn parse_numeric(text: &str) -> Option<NaiveDate> {
    let caps = NUMERIC_DATE_RE.captures(text)?;
    let first = &caps[1];
    let second: u32 = caps[2].parse().ok()?;
    let third = &caps[3];
    if first.len() == 4 {
        let year: i32 = first.parse().ok()?;
        let day: u32 = third.parse().ok()?;
        NaiveDate::from_ymd_opt(year, second, day)
    } else {
        // Day-first is the default reading for short numeric dates
        let day: u32 = first.parse().ok()?;
        let mut year: i32 = third.parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        NaiveDate::from_ymd_opt(year, second, day)
    }
}

fn parse_textual(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }
    let day: u32 = parts[0].parse().ok()?;
    let month = month_from_abbrev(parts[1])?;
    let mut year: i32 = parts[2].parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_fallback(text: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.date_naive());
    }
    const DATETIME_FORMATS: [&str; 5] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(stamp.date());
        }
    }
    const DATE_FORMATS: [&str; 2] = ["%d %B %Y", "%B %d, %Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}

/// Resolve a textual date to a calendar date. Returns `None` when nothing
/// matches; never panics.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = clean_text(text);
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_serial(&text) {
        return Some(date);
    }
    if let Some(date) = parse_numeric(&text) {
        return Some(date);
    }

    // Header labels like "Senin, 15/01/2024": drop everything before the comma
    if let Some((_, rest)) = text.split_once(',') {
        let rest = clean_text(rest);
        if let Some(date) = parse_numeric(&rest) {
            return Some(date);
        }
        if let Some(date) = parse_textual(&rest) {
            return Some(date);
        }
    }

    if let Some(date) = parse_textual(&text) {
        return Some(date);
    }
    parse_fallback(&text)
}

/// Locale display form: `"Senin, 15 Januari 2024"`.
pub fn format_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS_ID[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS_ID[date.month0() as usize];
    format!("{}, {:02} {} {}", weekday, date.day(), month, date.year())
}

/// Compact display form for schedule column labels: `"15 Jan 2024"`.
/// Labels that do not resolve to a date pass through unchanged.
pub fn format_column_label(label: &str) -> String {
    match parse_date(label) {
        Some(date) => format!(
            "{} {} {}",
            date.day(),
            MONTHS_ID_SHORT[date.month0() as usize],
            date.year()
        ),
        None => label.to_string(),
    }
}
