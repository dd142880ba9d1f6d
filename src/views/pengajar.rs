//! Teacher contacts: resolve a teacher row, normalize phone numbers and
//! build the WhatsApp deep link with a pre-filled introduction message.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::models::{field, field_of, Row, FIELD_MAPEL, FIELD_NAMA, FIELD_PENGAJAR};
use crate::parsers::match_key;

/// Header spellings seen in the wild for the WhatsApp number column.
const PHONE_HEADERS: [&str; 8] = [
    "No.Whatsapp",
    "No. Whatsapp",
    "No.whatsapp",
    "No Whatsapp",
    "Nowhatsapp",
    "Whatsapp",
    "WA",
    "No WA",
];

/// Reduce a header to lowercase alphanumerics; contact columns vary too much
/// for the plain match key.
fn loose_key(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn loose_field<'a>(row: &'a Row, names: &[&str]) -> &'a str {
    for name in names {
        let wanted = loose_key(name);
        let found = row
            .iter()
            .find(|(header, value)| loose_key(header) == wanted && !value.is_empty());
        if let Some((_, value)) = found {
            return value.as_str();
        }
    }
    ""
}

/// Normalize an Indonesian phone number to international digits:
/// `0812...` becomes `62812...`, existing `62` prefixes stay.
pub fn normalize_phone(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }
    if digits.starts_with("62") {
        return digits;
    }
    if let Some(rest) = digits.strip_prefix('0') {
        return format!("62{}", rest);
    }
    digits
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// The introduction message sent along with a contact request.
pub fn wa_message(student: &Row, keperluan: &str) -> String {
    let nama = non_empty_or(field(student, FIELD_NAMA), "-");
    let sekolah = non_empty_or(field(student, "Asal Sekolah"), "-");
    let kelas = non_empty_or(field_of(student, &["Kelompok Kelas", "Kelas", "Kelompok"]), "-");
    let cabang = non_empty_or(field(student, "Cabang"), "-");
    let keperluan = non_empty_or(keperluan.trim(), "-");
    format!(
        "Halo Kak, perkenalkan saya:\nNama: {}\nAsal Sekolah: {}\nKelas: {}\nCabang: {}\n\nKeperluan saya: {}.\n\nMohon responsnya ya kak, Terima kasih.",
        nama, sekolah, kelas, cabang, keperluan
    )
}

/// WhatsApp deep link for a contact row, or `None` when no usable number
/// exists.
pub fn wa_link(contact: &Row, student: &Row, keperluan: &str) -> Option<String> {
    let phone = normalize_phone(loose_field(contact, &PHONE_HEADERS));
    if phone.is_empty() {
        return None;
    }
    let message = wa_message(student, keperluan);
    let encoded = utf8_percent_encode(&message, NON_ALPHANUMERIC).to_string();
    Some(format!("https://wa.me/{}?text={}", phone, encoded))
}

/// Find a teacher row by name, preferring one that also matches the subject.
pub fn resolve_teacher<'a>(rows: &'a [Row], name: &str, mapel: &str) -> Option<&'a Row> {
    let wanted_name = match_key(name);
    let wanted_mapel = match_key(mapel);
    rows.iter()
        .find(|row| {
            let subject = field_of(row, &[FIELD_MAPEL, "Mapel"]);
            match_key(field(row, FIELD_PENGAJAR)) == wanted_name
                && (subject.is_empty() || match_key(subject) == wanted_mapel)
        })
        .or_else(|| {
            rows.iter()
                .find(|row| match_key(field(row, FIELD_PENGAJAR)) == wanted_name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Table;

    fn rows(headers: &[&str], records: &[&[&str]]) -> Vec<Row> {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            records
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .rows
    }

    #[test]
    fn normalizes_local_prefixes() {
        assert_eq!(normalize_phone("0812-3456-789"), "628123456789");
        assert_eq!(normalize_phone("+62 812 3456 789"), "628123456789");
        assert_eq!(normalize_phone("628123456789"), "628123456789");
        assert_eq!(normalize_phone("8123"), "8123");
        assert_eq!(normalize_phone("abc"), "");
    }

    #[test]
    fn link_requires_a_phone_number() {
        let contacts = rows(
            &["Pengajar", "No. Whatsapp"],
            &[&["Pak Andi", "0812345"], &["Bu Sari", ""]],
        );
        let students = rows(&["Nama"], &[&["Budi"]]);
        let link = wa_link(&contacts[0], &students[0], "tanya materi").unwrap();
        assert!(link.starts_with("https://wa.me/62812345?text="));
        assert!(link.contains("Budi"));
        assert!(wa_link(&contacts[1], &students[0], "tanya").is_none());
    }

    #[test]
    fn phone_header_spelling_is_loose() {
        let contacts = rows(&["Pengajar", "No.whatsapp"], &[&["Pak Andi", "0812345"]]);
        let students = rows(&["Nama"], &[&["Budi"]]);
        assert!(wa_link(&contacts[0], &students[0], "x").is_some());
    }

    #[test]
    fn message_fills_missing_fields_with_dashes() {
        let students = rows(&["Nama"], &[&["Budi"]]);
        let message = wa_message(&students[0], "");
        assert!(message.contains("Nama: Budi"));
        assert!(message.contains("Asal Sekolah: -"));
        assert!(message.contains("Keperluan saya: -."));
    }

    #[test]
    fn teacher_resolution_prefers_matching_subject() {
        let teachers = rows(
            &["Pengajar", "Mata Pelajaran"],
            &[
                &["Pak Andi", "Fisika"],
                &["Pak Andi", "Matematika"],
                &["Bu Sari", "Kimia"],
            ],
        );
        let row = resolve_teacher(&teachers, "pak andi", "Matematika").unwrap();
        assert_eq!(field(row, "Mata Pelajaran"), "Matematika");
        // Falls back to the name-only match when the subject is unknown
        let row = resolve_teacher(&teachers, "Bu Sari", "Biologi").unwrap();
        assert_eq!(field(row, "Mata Pelajaran"), "Kimia");
        assert!(resolve_teacher(&teachers, "Tidak Ada", "Fisika").is_none());
    }
}
