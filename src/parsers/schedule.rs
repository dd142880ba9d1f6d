//! Parsing of compact schedule cells.
//!
//! A cell usually holds `subject/time` (`mtk/08.00-09.00`), but multi-session
//! days arrive separated by newlines, semicolons or pipes, and occasionally
//! flattened into one string with nothing but the time ranges marking the
//! session boundaries.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::clean_text;

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,2}\.\d{2}\s*-\s*\d{1,2}\.\d{2}").expect("Invalid time range regex")
});

static TIME_LEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}\.\d{2}\s*-\s*\d{1,2}\.\d{2})\s*(.*)$").expect("Invalid time lead regex")
});

static SUBJECTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("mtk", "Matematika"),
        ("p.mtk", "Pendalaman Matematika"),
        ("b.ind", "Bahasa Indonesia"),
        ("l.ind", "Bahasa Indonesia"),
        ("b.ing", "Bahasa Inggris"),
        ("l.ing", "Bahasa Inggris"),
        ("pu", "Penalaran Umum"),
        ("ppu", "Pengetahuan dan Pemahaman Umum"),
        ("pbm", "Penalaran Bahasa"),
        ("pk", "Pengetahuan Kuantitatif"),
        ("libur", "Libur"),
    ])
});

/// One subject+time pair extracted from a schedule cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    pub time: String,
}

/// Expand a subject abbreviation; unrecognized labels pass through.
pub fn expand_subject(label: &str) -> String {
    let key = label.trim().to_lowercase();
    match SUBJECTS.get(key.as_str()) {
        Some(full) => (*full).to_string(),
        None => clean_text(label),
    }
}

fn parse_line(line: &str) -> Session {
    let line = line.trim();
    if line == "-" {
        return Session {
            subject: String::new(),
            time: String::new(),
        };
    }
    if let Some((subject, time)) = line.split_once('/') {
        let subject = clean_text(subject);
        let subject = if subject.is_empty() {
            clean_text(line)
        } else {
            subject
        };
        return Session {
            subject: expand_subject(&subject),
            time: clean_text(time),
        };
    }
    if let Some(caps) = TIME_LEAD_RE.captures(line) {
        return Session {
            subject: expand_subject(caps[2].trim()),
            time: clean_text(&caps[1]),
        };
    }
    Session {
        subject: expand_subject(line),
        time: String::new(),
    }
}

/// Parse a schedule cell into zero or more sessions.
///
/// `-` and empty cells yield nothing. Sessions split on newline, semicolon or
/// pipe; a separator-free cell containing two or more time ranges is
/// re-segmented on the time tokens, each time paired with the text that
/// follows it. Entries with neither subject nor time are discarded.
pub fn parse_schedule_cell(raw: &str) -> Vec<Session> {
    let cell = raw.replace('\r', "").replace("\\n", "\n");
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Vec::new();
    }

    let mut lines: Vec<String> = trimmed
        .split(['\n', ';', '|'])
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() <= 1 {
        let times: Vec<_> = TIME_RANGE_RE.find_iter(trimmed).collect();
        if times.len() >= 2 {
            lines = Vec::with_capacity(times.len());
            for (index, found) in times.iter().enumerate() {
                let tail_end = times
                    .get(index + 1)
                    .map(|next| next.start())
                    .unwrap_or(trimmed.len());
                let subject = trimmed[found.end()..tail_end].trim();
                lines.push(format!("{} {}", found.as_str(), subject).trim().to_string());
            }
        }
    }

    lines
        .iter()
        .map(|line| parse_line(line))
        .filter(|session| !session.subject.is_empty() || !session.time.is_empty())
        .collect()
}
