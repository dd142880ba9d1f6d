//! The identifier gate: a freeform NIS must resolve to a roster row before
//! any other view is served. There is no password; the hint list of known
//! identifiers is an operational aid, not a secret.

use crate::error::PortalError;
use crate::models::{field, Row, Table, FIELD_NIS};
use crate::parsers::nis::is_same_student;

const HINT_LIMIT: usize = 5;

/// Sample identifiers shown when an entered NIS does not resolve.
pub fn nis_examples(roster: &Table, limit: usize) -> Vec<String> {
    roster
        .rows
        .iter()
        .map(|row| field(row, FIELD_NIS))
        .filter(|value| !value.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Resolve an entered identifier to its roster row.
pub fn resolve_student<'a>(roster: &'a Table, nis: &str) -> Result<&'a Row, PortalError> {
    roster
        .rows
        .iter()
        .find(|row| is_same_student(field(row, FIELD_NIS), nis))
        .ok_or_else(|| PortalError::NotFound {
            nis: nis.trim().to_string(),
            hints: nis_examples(roster, HINT_LIMIT).join(", "),
        })
}
