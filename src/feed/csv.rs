//! Delimited-text wire shape.
//!
//! The export is a plain CSV dialect: quoted fields may embed commas,
//! newlines and doubled quotes; both `\n` and `\r\n` terminate records. The
//! first record is the header row; records that are blank after cleaning are
//! dropped.

use anyhow::{Context, Result};

use crate::models::Table;
use crate::parsers::clean_text;

pub fn decode_csv(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result.context("invalid CSV record")?;
        let cells: Vec<String> = record.iter().map(clean_text).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        records.push(cells);
    }

    if records.is_empty() {
        return Ok(Table::default());
    }

    let headers = records.remove(0);
    Ok(Table::new(headers, records))
}
