//! Utilities for parsing quoted strings in DBC files.
//!
//! These helpers support escaped quotes (`\"`). Quote counting drives the
//! multi-line `CM_` comment handling in the parser.

/// Counts unescaped double quotes in a string.
///
/// A quote is considered escaped if immediately preceded by an **odd** number
/// of backslashes. This matches how DBC escapes quoted content.
pub(crate) fn count_unescaped_quotes(s: &str) -> usize {
    let mut count = 0usize;
    let mut backslashes = 0usize;
    for ch in s.chars() {
        if ch == '\\' {
            backslashes += 1;
            continue;
        }
        if ch == '"' && backslashes.is_multiple_of(2) {
            count += 1;
        }
        backslashes = 0;
    }
    count
}

/// Splits a leading quoted segment off `s`.
///
/// `s` must start with `"`. Returns the text between the quotes (escapes left
/// as written) and the remainder after the closing quote, or `None` when the
/// quote is never closed.
pub(crate) fn take_quoted(s: &str) -> Option<(&str, &str)> {
    let body: &str = s.strip_prefix('"')?;
    let mut backslashes = 0usize;
    for (i, ch) in body.char_indices() {
        if ch == '\\' {
            backslashes += 1;
            continue;
        }
        if ch == '"' && backslashes.is_multiple_of(2) {
            return Some((&body[..i], &body[i + 1..]));
        }
        backslashes = 0;
    }
    None
}

/// Splits the first whitespace-delimited token off `s` (leading whitespace skipped).
pub(crate) fn take_token(s: &str) -> Option<(&str, &str)> {
    let s: &str = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(end) => Some((&s[..end], &s[end..])),
        None => Some((s, "")),
    }
}

/// DBC identifiers: C-like names made of ASCII letters, digits and `_`.
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
