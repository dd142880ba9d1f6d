//! Service/tutoring history summary: session counts per subject.

use crate::models::{field, Row, FIELD_MAPEL};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceSummary {
    /// Subject and session count, busiest first.
    pub entries: Vec<(String, usize)>,
    pub total: usize,
}

impl ServiceSummary {
    pub fn top(&self) -> &str {
        self.entries
            .first()
            .map(|(subject, _)| subject.as_str())
            .unwrap_or("-")
    }
}

pub fn summarize(rows: &[Row]) -> ServiceSummary {
    let mut entries: Vec<(String, usize)> = Vec::new();
    for row in rows {
        let subject = field(row, FIELD_MAPEL);
        let subject = if subject.is_empty() { "Lainnya" } else { subject };
        match entries.iter_mut().find(|(seen, _)| seen == subject) {
            Some((_, count)) => *count += 1,
            None => entries.push((subject.to_string(), 1)),
        }
    }
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    let total = entries.iter().map(|(_, count)| count).sum();
    ServiceSummary { entries, total }
}
