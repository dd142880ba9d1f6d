//! Dashboard cards: the student's biodata profile and the latest record of
//! every history table.

use chrono::NaiveDate;

use crate::models::{field, Row, Sheet, Snapshot};
use crate::project::{latest_for_student, record_date};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileField {
    pub label: &'static str,
    pub value: String,
}

const PROFILE_FIELDS: [(&str, &str); 9] = [
    ("Nama", "Nama"),
    ("NIS", "Nis"),
    ("Tanggal Lahir", "Tanggal Lahir"),
    ("Asal Sekolah", "Asal Sekolah"),
    ("Jenjang Studi", "Jenjang Studi"),
    ("Kelompok Kelas", "Kelompok Kelas"),
    ("Cabang", "Cabang"),
    ("No. WhatsApp", "No.whatsapp siswa"),
    ("Email", "Email"),
];

/// Label/value pairs for the biodata card; empty values render as `-`.
pub fn student_profile(student: &Row) -> Vec<ProfileField> {
    PROFILE_FIELDS
        .iter()
        .map(|&(label, header)| {
            let value = field(student, header);
            ProfileField {
                label,
                value: if value.is_empty() {
                    "-".to_string()
                } else {
                    value.to_string()
                },
            }
        })
        .collect()
}

#[derive(Debug, Default, Clone)]
pub struct LatestRecords {
    pub presensi: Option<Row>,
    pub perkembangan: Option<Row>,
    pub nilai: Option<Row>,
    pub pelayanan: Option<Row>,
    pub permintaan: Option<Row>,
}

pub fn latest_records(snapshot: &Snapshot, nis: &str) -> LatestRecords {
    LatestRecords {
        presensi: latest_for_student(snapshot.table(Sheet::Presensi), nis),
        perkembangan: latest_for_student(snapshot.table(Sheet::Perkembangan), nis),
        nilai: latest_nilai(snapshot, nis),
        pelayanan: latest_for_student(snapshot.table(Sheet::Pelayanan), nis),
        permintaan: latest_for_student(snapshot.table(Sheet::Permintaan), nis),
    }
}

/// Most recent score row across all score sheets.
pub fn latest_nilai(snapshot: &Snapshot, nis: &str) -> Option<Row> {
    let mut best: Option<(Option<NaiveDate>, Row)> = None;
    for sheet in Sheet::NILAI {
        if let Some(row) = latest_for_student(snapshot.table(sheet), nis) {
            let date = record_date(&row);
            let better = match &best {
                None => true,
                Some((best_date, _)) => date > *best_date,
            };
            if better {
                best = Some((date, row));
            }
        }
    }
    best.map(|(_, row)| row)
}
