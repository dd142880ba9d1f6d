//! Score history: tolerant numeric parsing plus a small aggregate.
//!
//! Scores come back from the sheets in mixed locales: `85,5`, `1.234,5` and
//! `1,234.5` all appear. The last separator wins as the decimal mark.

use crate::models::{field, Row, Sheet, Snapshot, FIELD_RERATA};
use crate::project::rows_for_student;

/// Parse a score cell; `None` when no number can be extracted.
pub fn parse_score(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(*c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let has_comma = cleaned.contains(',');
    let has_dot = cleaned.contains('.');
    let normalized = if has_comma && has_dot {
        if cleaned.rfind(',') > cleaned.rfind('.') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else if has_comma {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The score of one record, read from its `Rerata` column.
pub fn score_of(row: &Row) -> Option<f64> {
    parse_score(field(row, FIELD_RERATA))
}

/// One score category with the student's rows, newest first.
#[derive(Debug, Clone)]
pub struct ScoreDataset {
    pub label: &'static str,
    pub rows: Vec<Row>,
}

/// Per-category score history across every score sheet.
pub fn datasets(snapshot: &Snapshot, nis: &str) -> Vec<ScoreDataset> {
    Sheet::NILAI
        .into_iter()
        .map(|sheet| ScoreDataset {
            label: sheet.label(),
            rows: rows_for_student(snapshot.table(sheet), nis),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub count: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

/// Aggregate the numeric scores of a record set; `None` when no row has one.
pub fn summarize(rows: &[Row]) -> Option<ScoreSummary> {
    let scores: Vec<f64> = rows.iter().filter_map(score_of).collect();
    if scores.is_empty() {
        return None;
    }
    let sum: f64 = scores.iter().sum();
    let highest = scores.iter().cloned().fold(f64::MIN, f64::max);
    let lowest = scores.iter().cloned().fold(f64::MAX, f64::min);
    Some(ScoreSummary {
        count: scores.len(),
        average: sum / scores.len() as f64,
        highest,
        lowest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    #[test]
    fn parses_locale_decimal_forms() {
        assert_eq!(parse_score("85,5"), Some(85.5));
        assert_eq!(parse_score("85.5"), Some(85.5));
        assert_eq!(parse_score("1.234,5"), Some(1234.5));
        assert_eq!(parse_score("1,234.5"), Some(1234.5));
        assert_eq!(parse_score("90"), Some(90.0));
        assert_eq!(parse_score(" 78 poin"), Some(78.0));
    }

    #[test]
    fn non_numeric_cells_yield_none() {
        assert_eq!(parse_score(""), None);
        assert_eq!(parse_score("-"), None);
        assert_eq!(parse_score("belum ada"), None);
    }

    #[test]
    fn summary_aggregates_parseable_rows_only() {
        let table = Table::new(
            vec!["Rerata".to_string()],
            vec![
                vec!["80".to_string()],
                vec!["90,5".to_string()],
                vec!["-".to_string()],
            ],
        );
        let summary = summarize(&table.rows).unwrap();
        assert_eq!(summary.count, 2);
        assert!((summary.average - 85.25).abs() < 1e-9);
        assert_eq!(summary.highest, 90.5);
        assert_eq!(summary.lowest, 80.0);
    }

    #[test]
    fn summary_of_nothing_is_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn datasets_cover_every_score_category() {
        let mut snapshot = Snapshot::default();
        snapshot.set(
            Sheet::NilaiUtbk,
            Table::new(
                vec!["Nis".to_string(), "Rerata".to_string()],
                vec![vec!["1".to_string(), "80".to_string()]],
            ),
        );
        let datasets = datasets(&snapshot, "1");
        assert_eq!(datasets.len(), Sheet::NILAI.len());
        assert_eq!(datasets[0].label, "Nilai UTBK");
        assert_eq!(datasets[0].rows.len(), 1);
        assert!(datasets[1].rows.is_empty());
    }
}
