//! Attendance history summary.

use crate::models::{field, Row, FIELD_STATUS};
use crate::parsers::match_key;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub hadir: usize,
    pub sakit: usize,
    pub izin: usize,
    pub alpha: usize,
}

impl AttendanceSummary {
    pub fn total(&self) -> usize {
        self.hadir + self.sakit + self.izin + self.alpha
    }

    /// Dominant status, or `-` when nothing was recorded. Ties resolve in
    /// Hadir/Sakit/Izin/Alpha order.
    pub fn most(&self) -> &'static str {
        if self.total() == 0 {
            return "-";
        }
        let mut best = ("Hadir", self.hadir);
        for entry in [("Sakit", self.sakit), ("Izin", self.izin), ("Alpha", self.alpha)] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        best.0
    }
}

/// Count the four known statuses; anything else is ignored.
pub fn summarize(rows: &[Row]) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    for row in rows {
        match match_key(field(row, FIELD_STATUS)).as_str() {
            "hadir" => summary.hadir += 1,
            "sakit" => summary.sakit += 1,
            "izin" => summary.izin += 1,
            "alpha" => summary.alpha += 1,
            _ => {}
        }
    }
    summary
}
