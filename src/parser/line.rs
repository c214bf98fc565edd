//! Line Classification
//!
//! Turns one physical line (newline already stripped) into a `Line`.
//! Whitespace is the ASCII set recognised by C's `isspace`, which
//! includes vertical tab.

use crate::constants::parse::{COMMENT_MARKERS, SEPARATOR};

/// Result of classifying a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty or whitespace only
    Blank,
    /// First non-blank character is `#` or `;`
    Comment,
    /// No `=` anywhere on the line (trimmed content)
    Malformed(&'a str),
    /// Trimmed key and trimmed, comment-stripped value
    Pair { key: &'a str, value: &'a str },
}

pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

pub fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Cut the value at the first `#` or `;` and drop whitespace left before it.
///
/// No escaping exists, so a value can never contain either marker.
pub fn strip_inline_comment(value: &str) -> &str {
    match value.find(COMMENT_MARKERS) {
        Some(idx) => trim(&value[..idx]),
        None => value,
    }
}

/// Longest prefix of `line` that fits in `max_bytes` without splitting a character.
pub fn truncate_line(line: &str, max_bytes: usize) -> &str {
    if line.len() <= max_bytes {
        return line;
    }
    let mut end = max_bytes;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    &line[..end]
}

pub fn classify(raw: &str) -> Line<'_> {
    let trimmed = trim(raw);

    if trimmed.is_empty() {
        return Line::Blank;
    }
    if trimmed.starts_with(COMMENT_MARKERS) {
        return Line::Comment;
    }

    let Some((key, value)) = trimmed.split_once(SEPARATOR) else {
        return Line::Malformed(trimmed);
    };

    Line::Pair {
        key: trim(key),
        value: strip_inline_comment(trim(value)),
    }
}
