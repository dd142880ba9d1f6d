//! Per-student record projection: filter a table to one student's rows,
//! newest first, plus the row filters the history views apply on top.

use chrono::NaiveDate;
use tracing::warn;

use crate::models::{field, Row, Table, FIELD_NIS, FIELD_TANGGAL, FIELD_TIMESTAMP};
use crate::parsers::date::parse_date;
use crate::parsers::match_key;
use crate::parsers::nis::is_same_student;

/// Resolved event date of a record: `Tanggal`, falling back to `Timestamp`.
pub fn record_date(row: &Row) -> Option<NaiveDate> {
    if let Some(date) = parse_date(field(row, FIELD_TANGGAL)) {
        return Some(date);
    }
    parse_date(field(row, FIELD_TIMESTAMP))
}

/// Stable date-descending sort; rows without a resolvable date sink to the
/// end in their original order.
pub fn sort_rows_by_date_desc(rows: &mut [Row]) {
    rows.sort_by(|a, b| {
        let date_a = record_date(a);
        let date_b = record_date(b);
        match (date_a, date_b) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
    });
}

/// All rows belonging to one student, newest first.
///
/// A table without a NIS column degrades to its full row set. That masks a
/// header-detection failure, so it is logged loudly, but the behavior itself
/// is load-bearing for single-student helper sheets.
pub fn rows_for_student(table: &Table, nis: &str) -> Vec<Row> {
    let mut rows: Vec<Row> = match table.find_header(FIELD_NIS) {
        Some(header) => table
            .rows
            .iter()
            .filter(|row| {
                let value = row.get(header).map(String::as_str).unwrap_or("");
                is_same_student(value, nis)
            })
            .cloned()
            .collect(),
        None => {
            if !table.rows.is_empty() {
                warn!(
                    "Table has no NIS column; returning all {} rows unfiltered",
                    table.rows.len()
                );
            }
            table.rows.clone()
        }
    };
    sort_rows_by_date_desc(&mut rows);
    rows
}

/// The most recent record for one student, if any.
pub fn latest_for_student(table: &Table, nis: &str) -> Option<Row> {
    rows_for_student(table, nis).into_iter().next()
}

/// Case-insensitive substring filter; an empty filter matches everything.
pub fn matches_text_filter(value: &str, filter: &str) -> bool {
    if filter.trim().is_empty() {
        return true;
    }
    match_key(value).contains(&match_key(filter))
}

/// Same-calendar-day filter when both sides resolve to dates, raw substring
/// match otherwise.
pub fn matches_date_filter(value: &str, filter: &str) -> bool {
    if filter.trim().is_empty() {
        return true;
    }
    match (parse_date(value), parse_date(filter)) {
        (Some(a), Some(b)) => a == b,
        _ => value.contains(filter.trim()),
    }
}

/// Distinct non-empty values of one column, sorted.
pub fn unique_values(rows: &[Row], name: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for row in rows {
        let value = field(row, name);
        if !value.is_empty() && !values.iter().any(|seen| seen == value) {
            values.push(value.to_string());
        }
    }
    values.sort();
    values
}
