//! Utility functions for string manipulation.

/// Title-case a string: the first letter of every alphabetic run is
/// upper-cased and the rest of the run lower-cased.
///
/// Non-alphabetic characters (spaces, digits, apostrophes) end a run, so
/// `"what's up"` becomes `"What'S Up"` and `"last_30d"` becomes `"Last_30D"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Turn an identifier-like label into display text: underscores become
/// spaces, then the result is title-cased.
pub fn humanize(s: &str) -> String {
    title_case(&s.replace('_', " "))
}

/// Find the nearest valid UTF-8 char boundary at or before the given byte index.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Truncate a string to approximately `max_len` bytes, ensuring valid UTF-8 boundaries.
#[inline]
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        &s[..floor_char_boundary(s, max_len)]
    }
}
