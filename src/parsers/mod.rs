pub mod date;
pub mod nis;
pub mod schedule;

/// Clean and normalize a cell value: non-breaking spaces and control
/// characters become regular spaces, whitespace runs collapse to one space,
/// leading/trailing whitespace is trimmed. Idempotent.
pub fn clean_text(text: &str) -> String {
    text.replace('\u{00A0}', " ")
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison key for header names and free-text filters: cleaned and
/// lowercased. Every header lookup goes through this, never raw equality.
pub fn match_key(text: &str) -> String {
    clean_text(text).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  a\u{00A0} b\t\nc  "), "a b c");
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn clean_text_is_idempotent() {
        for raw in ["  Budi\u{00A0} Santoso ", "x", "", "\t\r\n", "a  b"] {
            let once = clean_text(raw);
            assert_eq!(clean_text(&once), once);
        }
    }

    #[test]
    fn match_key_ignores_case_and_spacing() {
        assert_eq!(match_key("Mata  Pelajaran"), match_key(" mata pelajaran "));
        assert_eq!(match_key("NIS"), "nis");
    }
}
