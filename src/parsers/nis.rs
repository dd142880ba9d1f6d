//! Fuzzy matching of student identifiers.
//!
//! NIS values arrive in many shapes: with or without dash groups, with
//! leading zeros, sometimes with stray invisible characters pasted in from
//! chat apps. The roster join has to tolerate all of them.

/// Zero-width and other invisible characters stripped before comparison.
const INVISIBLES: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

fn fold(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && !INVISIBLES.contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_leading_zeros(value: &str) -> &str {
    let stripped = value.trim_start_matches('0');
    if stripped.is_empty() && !value.is_empty() {
        // "000" denotes zero, not nothing
        "0"
    } else {
        stripped
    }
}

fn alnum_key(value: &str) -> String {
    value.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn digit_key(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Whether two identifier strings denote the same student.
///
/// Tried in order, first hit wins:
/// 1. equality after stripping whitespace/invisibles and lowercasing
/// 2. equality after additionally dropping non-alphanumerics and leading zeros
/// 3. equality of the digit-only forms, leading zeros dropped
/// 4. full numeric equality
///
/// Rule 3 is intentionally loose: `33-442-001-5` matches `334420015`. Empty
/// input on either side never matches.
pub fn is_same_student(candidate: &str, target: &str) -> bool {
    let a = fold(candidate);
    let b = fold(target);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }

    let a_alnum = alnum_key(&a);
    let b_alnum = alnum_key(&b);
    if !a_alnum.is_empty()
        && !b_alnum.is_empty()
        && strip_leading_zeros(&a_alnum) == strip_leading_zeros(&b_alnum)
    {
        return true;
    }

    let a_digits = digit_key(&a);
    let b_digits = digit_key(&b);
    if !a_digits.is_empty()
        && !b_digits.is_empty()
        && strip_leading_zeros(&a_digits) == strip_leading_zeros(&b_digits)
    {
        return true;
    }

    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
