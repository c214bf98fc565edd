//! Wildcard Matching
//!
//! Shell-style matching of whole strings, with the semantics of
//! `fnmatch(pattern, string, 0)`:
//!
//! - `*` any run of characters, including empty, `/` and `.`; runs of `*` act as one
//! - `?` exactly one character
//! - `[set]`, `[!set]`, `[^set]` one character in / not in the set
//! - `\c` matches `c` literally, inside or outside a set
//! - a `[` without a closing `]` is an ordinary character
//! - a trailing lone `\` makes the pattern match nothing
//! - case-sensitive, anchored at both ends
//!
//! Patterns are rewritten into `glob::Pattern` syntax before compiling so
//! the glob crate's path rules (`**` components, no escapes) never apply.
//! POSIX named classes such as `[:alpha:]` are not recognised.

use glob::{MatchOptions, Pattern};

/// Flags used for every key and value match
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled wildcard pattern
#[derive(Debug, Clone)]
pub enum Wildcard {
    Glob(Pattern),
    /// Pattern ends in an unpaired `\`
    Never,
}

impl Wildcard {
    pub fn new(pattern: &str) -> Self {
        let Some(translated) = translate(pattern) else {
            tracing::trace!(pattern, "Trailing backslash, pattern matches nothing");
            return Self::Never;
        };

        match Pattern::new(&translated) {
            Ok(p) => Self::Glob(p),
            Err(e) => {
                // translate() only emits valid glob syntax
                tracing::warn!(pattern, %translated, error = %e, "Untranslatable wildcard");
                Self::Never
            }
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Glob(p) => p.matches_with(candidate, MATCH_OPTIONS),
            Self::Never => false,
        }
    }
}

/// One-shot match of `candidate` against `pattern`
pub fn wildcard_match(pattern: &str, candidate: &str) -> bool {
    Wildcard::new(pattern).matches(candidate)
}

/// Backslash-escape every wildcard character so `s` only matches itself.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Rewrite an fnmatch pattern into glob crate syntax. `None` for a trailing `\`.
fn translate(pattern: &str) -> Option<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut i = 0;
    let mut last_star = false;

    while i < chars.len() {
        let c = chars[i];
        if c == '*' {
            if !last_star {
                out.push('*');
            }
            last_star = true;
            i += 1;
            continue;
        }
        last_star = false;

        match c {
            '\\' => {
                push_literal(&mut out, *chars.get(i + 1)?);
                i += 2;
            }
            '[' => match translate_class(&chars, i) {
                Some((class, end)) => {
                    out.push_str(&class);
                    i = end;
                }
                None => {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    Some(out)
}

fn push_literal(out: &mut String, c: char) {
    if matches!(c, '*' | '?' | '[' | ']') {
        out.push('[');
        out.push(c);
        out.push(']');
    } else {
        out.push(c);
    }
}

/// Translate the set opening at `start`. Returns the glob text and the index
/// just past the closing `]`, or `None` when the set is unterminated.
fn translate_class(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut j = start + 1;
    let negated = matches!(chars.get(j), Some('!' | '^'));
    if negated {
        j += 1;
    }

    // (char, escaped)
    let mut members: Vec<(char, bool)> = Vec::new();
    loop {
        let c = *chars.get(j)?;
        if c == ']' && !members.is_empty() {
            j += 1;
            break;
        }
        if c == '\\' {
            members.push((*chars.get(j + 1)?, true));
            j += 2;
        } else {
            members.push((c, false));
            j += 1;
        }
    }

    // glob only accepts `]` as the first member and treats a leading `!` as
    // negation, so those members are moved; an escaped `-` goes last.
    let has_close = members.iter().any(|&(c, _)| c == ']');
    let mut body = String::new();
    if has_close {
        body.push(']');
    }
    let mut dash = false;
    let mut bang = false;
    for &(c, escaped) in &members {
        match (c, escaped) {
            (']', _) => {}
            ('-', true) => dash = true,
            ('!', true) if !negated => bang = true,
            _ => body.push(c),
        }
    }
    if (dash || bang) && body.ends_with('-') {
        body.pop();
        dash = true;
    }
    if bang {
        body.push('!');
    }
    if dash {
        body.push('-');
    }

    if !negated && body.starts_with('!') {
        if body == "!" {
            return Some(("!".to_string(), j));
        }
        // only "!-" can start with '!' here
        body = "-!".to_string();
    }

    let prefix = if negated { "[!" } else { "[" };
    Some((format!("{prefix}{body}]"), j))
}
