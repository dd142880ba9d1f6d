//! Structured-JSON wire shape.
//!
//! The feed wraps a JSON document in a JavaScript callback; only the text
//! between the first `{` and the last `}` is JSON. Cell values may be absent
//! or null and are normalized to empty strings. Declared column labels are
//! used as headers unless they are all synthetic placeholders, in which case
//! the first data row is promoted to the header row.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::models::Table;
use crate::parsers::clean_text;

#[derive(Debug, Deserialize)]
struct GvizPayload {
    table: GvizTable,
}

#[derive(Debug, Deserialize)]
struct GvizTable {
    #[serde(default)]
    cols: Vec<GvizColumn>,
    #[serde(default)]
    rows: Vec<GvizRow>,
}

#[derive(Debug, Deserialize)]
struct GvizColumn {
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GvizRow {
    #[serde(default)]
    c: Vec<Option<GvizCell>>,
}

#[derive(Debug, Deserialize)]
struct GvizCell {
    #[serde(default)]
    v: Option<serde_json::Value>,
}

static SYNTHETIC_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^column \d+$").expect("Invalid column label regex"));

fn cell_text(cell: &Option<GvizCell>) -> String {
    let value = match cell {
        Some(cell) => &cell.v,
        None => &None,
    };
    match value {
        Some(serde_json::Value::String(text)) => clean_text(text),
        Some(serde_json::Value::Number(number)) => match number.as_i64() {
            Some(integer) => integer.to_string(),
            None => number.to_string(),
        },
        Some(serde_json::Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn is_synthetic_label(label: &str) -> bool {
    label.is_empty()
        || (label.chars().count() == 1 && label.chars().all(char::is_alphabetic))
        || SYNTHETIC_LABEL_RE.is_match(label)
}

pub fn decode_gviz(text: &str) -> Result<Table> {
    let start = text.find('{').context("no JSON object in gviz payload")?;
    let end = text.rfind('}').context("no JSON object in gviz payload")?;
    if end < start {
        bail!("no JSON object in gviz payload");
    }

    let payload: GvizPayload =
        serde_json::from_str(&text[start..=end]).context("invalid gviz JSON")?;

    let labels: Vec<String> = payload
        .table
        .cols
        .iter()
        .map(|column| clean_text(column.label.as_deref().unwrap_or("")))
        .collect();

    let mut records: Vec<Vec<String>> = payload
        .table
        .rows
        .iter()
        .map(|row| row.c.iter().map(cell_text).collect())
        .collect();

    let headers = if labels.iter().any(|label| !is_synthetic_label(label)) {
        labels
    } else if records.is_empty() {
        return Ok(Table::default());
    } else {
        records.remove(0)
    };

    Ok(Table::new(headers, records))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::field;

    fn wrap(json: &str) -> String {
        format!(
            "/*O_o*/\ngoogle.visualization.Query.setResponse({});",
            json
        )
    }

    #[test]
    fn strips_the_callback_wrapper() {
        let body = wrap(
            r#"{"table":{"cols":[{"label":"Nis"},{"label":"Nama"}],
                "rows":[{"c":[{"v":"123"},{"v":"Budi"}]}]}}"#,
        );
        let table = decode_gviz(&body).unwrap();
        assert_eq!(table.headers, vec!["Nis", "Nama"]);
        assert_eq!(field(&table.rows[0], "Nama"), "Budi");
    }

    #[test]
    fn null_and_missing_cells_become_empty_strings() {
        let body = wrap(
            r#"{"table":{"cols":[{"label":"Nis"},{"label":"Nama"}],
                "rows":[{"c":[null,{"v":null}]},{"c":[{"v":"9"}]}]}}"#,
        );
        let table = decode_gviz(&body).unwrap();
        assert_eq!(field(&table.rows[0], "Nis"), "");
        assert_eq!(field(&table.rows[0], "Nama"), "");
        assert_eq!(field(&table.rows[1], "Nis"), "9");
        assert_eq!(field(&table.rows[1], "Nama"), "");
    }

    #[test]
    fn numeric_and_boolean_cells_are_stringified() {
        let body = wrap(
            r#"{"table":{"cols":[{"label":"Rerata"},{"label":"Lulus"}],
                "rows":[{"c":[{"v":85.5},{"v":true}]},{"c":[{"v":90},{"v":false}]}]}}"#,
        );
        let table = decode_gviz(&body).unwrap();
        assert_eq!(field(&table.rows[0], "Rerata"), "85.5");
        assert_eq!(field(&table.rows[0], "Lulus"), "true");
        assert_eq!(field(&table.rows[1], "Rerata"), "90");
    }

    #[test]
    fn synthetic_labels_promote_the_first_row_to_headers() {
        let body = wrap(
            r#"{"table":{"cols":[{"label":"A"},{"label":""}],
                "rows":[{"c":[{"v":"Pengajar"},{"v":"Mata Pelajaran"}]},
                        {"c":[{"v":"Pak Andi"},{"v":"Matematika"}]}]}}"#,
        );
        let table = decode_gviz(&body).unwrap();
        assert_eq!(table.headers, vec!["Pengajar", "Mata Pelajaran"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(field(&table.rows[0], "Pengajar"), "Pak Andi");
    }

    #[test]
    fn column_n_placeholders_count_as_synthetic() {
        let body = wrap(
            r#"{"table":{"cols":[{"label":"Column 1"},{"label":"Column 2"}],
                "rows":[{"c":[{"v":"Nis"},{"v":"Nama"}]},
                        {"c":[{"v":"1"},{"v":"Budi"}]}]}}"#,
        );
        let table = decode_gviz(&body).unwrap();
        assert_eq!(table.headers, vec!["Nis", "Nama"]);
    }

    #[test]
    fn garbage_payloads_fail_to_parse() {
        assert!(decode_gviz("no json here").is_err());
        assert!(decode_gviz("{not valid json}").is_err());
    }

    #[test]
    fn serial_dates_survive_as_text() {
        let body = wrap(
            r#"{"table":{"cols":[{"label":"Tanggal"}],
                "rows":[{"c":[{"v":"Date(2024,0,15)"}]}]}}"#,
        );
        let table = decode_gviz(&body).unwrap();
        assert_eq!(field(&table.rows[0], "Tanggal"), "Date(2024,0,15)");
    }
}
