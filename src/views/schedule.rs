//! Schedule views: derive date columns from the schedule table header row,
//! pick the row that applies to a student, and look up today's sessions.

use chrono::NaiveDate;

use crate::models::{
    field, Row, Table, FIELD_ASAL_SEKOLAH, FIELD_CABANG, FIELD_KELOMPOK_KELAS,
};
use crate::parsers::date::parse_date;
use crate::parsers::match_key;
use crate::parsers::schedule::{expand_subject, parse_schedule_cell, Session};

/// One schedule column: a date header, plus an optional paired time column
/// when the sheet splits subject and time into two columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleColumn {
    pub date_label: String,
    pub mapel: String,
    pub jam: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Today,
    Past,
    Upcoming,
    Undated,
}

/// Derive one column per date header. `Jam`-prefixed headers pair with the
/// preceding date column instead of producing their own.
pub fn schedule_columns(table: &Table) -> Vec<ScheduleColumn> {
    let reserved = [FIELD_CABANG, FIELD_KELOMPOK_KELAS, FIELD_ASAL_SEKOLAH].map(match_key);
    let mut columns = Vec::new();
    let mut index = 0;
    while index < table.headers.len() {
        let header = table.headers[index].clone();
        let key = match_key(&header);
        index += 1;
        if header.is_empty() || reserved.contains(&key) || key.starts_with("jam") {
            continue;
        }
        let jam = table
            .headers
            .get(index)
            .filter(|next| match_key(next).starts_with("jam"))
            .cloned();
        columns.push(ScheduleColumn {
            date_label: header.clone(),
            mapel: header,
            jam,
        });
    }
    columns
}

/// Order columns for display: today and later first (ascending), then the
/// past. Columns whose label never resolves to a date are dropped.
pub fn order_columns(columns: &[ScheduleColumn], today: NaiveDate) -> Vec<ScheduleColumn> {
    let mut ordered: Vec<ScheduleColumn> = columns.to_vec();
    ordered.sort_by_key(|column| parse_date(&column.date_label));

    let mut from_today = Vec::new();
    let mut past = Vec::new();
    for column in ordered {
        match parse_date(&column.date_label) {
            Some(date) if date >= today => from_today.push(column),
            Some(_) => past.push(column),
            None => {}
        }
    }
    from_today.extend(past);
    from_today
}

pub fn day_status(column: &ScheduleColumn, today: NaiveDate) -> DayStatus {
    match parse_date(&column.date_label) {
        Some(date) if date == today => DayStatus::Today,
        Some(date) if date < today => DayStatus::Past,
        Some(_) => DayStatus::Upcoming,
        None => DayStatus::Undated,
    }
}

/// The sessions of one schedule row under one column.
pub fn sessions_for(row: &Row, column: &ScheduleColumn) -> Vec<Session> {
    if let Some(jam) = &column.jam {
        let subject = field(row, &column.mapel);
        let time = field(row, jam);
        if subject.is_empty() && time.is_empty() {
            return Vec::new();
        }
        return vec![Session {
            subject: expand_subject(subject),
            time: time.to_string(),
        }];
    }
    parse_schedule_cell(field(row, &column.date_label))
}

/// Split a student's class-group cell into its component groups.
pub fn class_groups(student: &Row) -> Vec<String> {
    field(student, FIELD_KELOMPOK_KELAS)
        .split([',', ';'])
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(str::to_string)
        .collect()
}

fn has_any_session(row: &Row, columns: &[ScheduleColumn]) -> bool {
    columns.iter().any(|column| !sessions_for(row, column).is_empty())
}

fn pick_row<'a>(matches: Vec<&'a Row>, columns: &[ScheduleColumn]) -> Option<&'a Row> {
    matches
        .iter()
        .find(|row| has_any_session(row, columns))
        .copied()
        .or_else(|| matches.first().copied())
}

/// Regular schedule row for a student: the class group of the row must be one
/// of the student's groups. Rows that actually carry sessions win.
pub fn select_reguler_row<'a>(table: &'a Table, student: &Row) -> Option<&'a Row> {
    let groups = class_groups(student);
    if groups.is_empty() {
        return None;
    }
    let group_keys: Vec<String> = groups.iter().map(|group| match_key(group)).collect();
    let columns = schedule_columns(table);
    let matches: Vec<&Row> = table
        .rows
        .iter()
        .filter(|row| group_keys.contains(&match_key(field(row, FIELD_KELOMPOK_KELAS))))
        .collect();
    pick_row(matches, &columns)
}

/// Extra schedule row: the row's branch or class group equals the student's
/// school of origin.
pub fn select_tambahan_row<'a>(table: &'a Table, student: &Row) -> Option<&'a Row> {
    let school = field(student, FIELD_ASAL_SEKOLAH);
    if school.is_empty() {
        return None;
    }
    let wanted = match_key(school);
    let columns = schedule_columns(table);
    let matches: Vec<&Row> = table
        .rows
        .iter()
        .filter(|row| {
            match_key(field(row, FIELD_CABANG)) == wanted
                || match_key(field(row, FIELD_KELOMPOK_KELAS)) == wanted
        })
        .collect();
    pick_row(matches, &columns)
}

/// The column whose label resolves to the given day, if any.
pub fn column_for_day<'a>(
    columns: &'a [ScheduleColumn],
    day: NaiveDate,
) -> Option<&'a ScheduleColumn> {
    columns
        .iter()
        .find(|column| parse_date(&column.date_label) == Some(day))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodaySchedule {
    pub label: &'static str,
    pub session: Session,
}

/// Today's session for the dashboard card. The regular schedule wins; the
/// extra schedule fills in when the regular row has nothing today.
pub fn today_schedule(
    reguler: Option<(&Row, &[ScheduleColumn])>,
    tambahan: Option<(&Row, &[ScheduleColumn])>,
    today: NaiveDate,
) -> Option<TodaySchedule> {
    if let Some((row, columns)) = reguler {
        if let Some(column) = column_for_day(columns, today) {
            if let Some(session) = sessions_for(row, column).into_iter().next() {
                return Some(TodaySchedule {
                    label: "Jadwal Reguler",
                    session,
                });
            }
        }
    }
    if let Some((row, columns)) = tambahan {
        if let Some(column) = column_for_day(columns, today) {
            if let Some(session) = sessions_for(row, column).into_iter().next() {
                return Some(TodaySchedule {
                    label: "Jadwal Tambahan",
                    session,
                });
            }
        }
    }
    None
}
