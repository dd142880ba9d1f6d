use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::Sheet;
use crate::parsers::match_key;

/// One record: header name to cell value. Duplicate headers collapse onto the
/// last occurrence, mirroring how the feeds themselves behave.
pub type Row = HashMap<String, String>;

/// An immutable fetched table: ordered headers plus rows. Replaced wholesale
/// on refresh, never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let rows = records
            .into_iter()
            .map(|cells| zip_row(&headers, cells))
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Locate a header by case/whitespace-insensitive name.
    pub fn find_header(&self, name: &str) -> Option<&str> {
        let wanted = match_key(name);
        self.headers
            .iter()
            .map(String::as_str)
            .find(|header| match_key(header) == wanted)
    }

    /// A copy bounded to the first `max_rows` rows, for the cache.
    pub fn truncated(&self, max_rows: usize) -> Table {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().take(max_rows).cloned().collect(),
        }
    }

    /// Content fingerprint used to detect unchanged sheets across refreshes.
    pub fn content_hash(&self) -> String {
        let mut context = md5::Context::new();
        for header in &self.headers {
            context.consume(header.as_bytes());
            context.consume(b"\x1f");
        }
        context.consume(b"\x1e");
        for row in &self.rows {
            for header in &self.headers {
                let cell = row.get(header).map(String::as_str).unwrap_or("");
                context.consume(cell.as_bytes());
                context.consume(b"\x1f");
            }
            context.consume(b"\x1e");
        }
        format!("{:x}", context.compute())
    }
}

fn zip_row(headers: &[String], cells: Vec<String>) -> Row {
    let mut row = Row::with_capacity(headers.len());
    for (index, header) in headers.iter().enumerate() {
        row.insert(header.clone(), cells.get(index).cloned().unwrap_or_default());
    }
    row
}

/// Case/whitespace-insensitive field access on a row. Missing fields read as
/// the empty string.
pub fn field<'a>(row: &'a Row, name: &str) -> &'a str {
    let wanted = match_key(name);
    row.iter()
        .find(|(header, _)| match_key(header) == wanted)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

/// First non-empty value among several candidate field names.
pub fn field_of<'a>(row: &'a Row, names: &[&str]) -> &'a str {
    for name in names {
        let value = field(row, name);
        if !value.is_empty() {
            return value;
        }
    }
    ""
}

static EMPTY_TABLE: Lazy<Table> = Lazy::new(Table::default);

/// The full data set of one load, keyed by sheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub tables: BTreeMap<String, Table>,
}

impl Snapshot {
    pub fn table(&self, sheet: Sheet) -> &Table {
        self.tables.get(sheet.key()).unwrap_or(&EMPTY_TABLE)
    }

    pub fn set(&mut self, sheet: Sheet, table: Table) {
        self.tables.insert(sheet.key().to_string(), table);
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Table::is_empty)
    }

    /// Union of the score sheets: headers merged in first-seen order, rows
    /// concatenated.
    pub fn nilai_merged(&self) -> Table {
        let mut headers: Vec<String> = Vec::new();
        let mut rows = Vec::new();
        for sheet in Sheet::NILAI {
            let table = self.table(sheet);
            for header in &table.headers {
                if !headers.contains(header) {
                    headers.push(header.clone());
                }
            }
            rows.extend(table.rows.iter().cloned());
        }
        Table { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn table(headers: &[&str], records: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            records
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn short_records_pad_with_empty_cells() {
        let t = table(&["Nis", "Nama"], &[&["123"]]);
        assert_eq!(field(&t.rows[0], "Nama"), "");
        assert_eq!(field(&t.rows[0], "Nis"), "123");
    }

    #[test]
    fn header_lookup_ignores_case_and_spacing() {
        let t = table(&["NIS ", "Mata  Pelajaran"], &[]);
        assert_eq!(t.find_header("nis"), Some("NIS "));
        assert_eq!(t.find_header("Mata Pelajaran"), Some("Mata  Pelajaran"));
        assert_eq!(t.find_header("Tanggal"), None);
    }

    #[test]
    fn field_of_takes_the_first_non_empty_candidate() {
        let t = table(&["Kelas", "Kelompok"], &[&["", "IPA-1"]]);
        assert_eq!(field_of(&t.rows[0], &["Kelas", "Kelompok"]), "IPA-1");
        assert_eq!(field_of(&t.rows[0], &["Cabang"]), "");
    }

    #[test]
    fn content_hash_tracks_cell_changes() {
        let a = table(&["Nis"], &[&["1"]]);
        let b = table(&["Nis"], &[&["1"]]);
        let c = table(&["Nis"], &[&["2"]]);
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn truncation_bounds_rows() {
        let t = table(&["Nis"], &[&["1"], &["2"], &["3"]]);
        assert_eq!(t.truncated(2).rows.len(), 2);
        assert_eq!(t.truncated(10).rows.len(), 3);
    }

    #[test]
    fn nilai_merges_headers_and_rows() {
        let mut snapshot = Snapshot::default();
        snapshot.set(Sheet::NilaiUtbk, table(&["Nis", "Rerata"], &[&["1", "80"]]));
        snapshot.set(Sheet::NilaiTkaSma, table(&["Nis", "Mapel"], &[&["2", "MTK"]]));
        let merged = snapshot.nilai_merged();
        assert_eq!(merged.headers, vec!["Nis", "Rerata", "Mapel"]);
        assert_eq!(merged.rows.len(), 2);
    }

    #[test]
    fn missing_sheet_reads_as_an_empty_table() {
        let snapshot = Snapshot::default();
        assert!(snapshot.table(Sheet::Presensi).is_empty());
        assert!(snapshot.is_empty());
    }
}
