//! Tilde and Path Expansion
//!
//! Two separate expansions:
//!
//! - **Values**: a leading `~` followed by `/` or end-of-string becomes `HOME`.
//!   `~user` is left alone, as is everything when `HOME` is unset.
//! - **Load paths**: a small shell-like word expansion. Supports a leading
//!   `~`, `$VAR` and `${VAR}`, single quotes, double quotes (variables still
//!   expand inside), backslash escapes, field splitting of unquoted
//!   variables and filesystem globs on unquoted `*`, `?`, `[`. Anything that
//!   does not produce exactly one word falls back to the literal path.

use std::borrow::Cow;
use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use tracing::debug;

use crate::constants::env::HOME;

/// Unquoted characters the shell would treat as operators or command substitution
const UNSUPPORTED_CHARS: &[char] = &['|', '&', ';', '<', '>', '(', ')', '{', '}', '`', '\n'];

/// Replace a leading `~` or `~/` in a value with `home`.
pub fn expand_home<'a>(value: &'a str, home: Option<&str>) -> Cow<'a, str> {
    let Some(rest) = value.strip_prefix('~') else {
        return Cow::Borrowed(value);
    };
    if !(rest.is_empty() || rest.starts_with('/')) {
        return Cow::Borrowed(value);
    }
    match home {
        Some(home) => Cow::Owned(format!("{home}{rest}")),
        None => Cow::Borrowed(value),
    }
}

/// Expand a load path against the process environment.
///
/// `~` prefers `HOME` and falls back to the platform home directory.
pub fn expand_path(path: &str) -> PathBuf {
    expand_path_with(path, |name| {
        env::var(name).ok().or_else(|| {
            (name == HOME)
                .then(BaseDirs::new)
                .flatten()
                .map(|dirs| dirs.home_dir().to_string_lossy().into_owned())
        })
    })
}

/// Expand a load path, resolving variables through `lookup`.
pub fn expand_path_with<F>(path: &str, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let Some(words) = split_words(path, &lookup) else {
        debug!(path, "Unsupported syntax in path, using it literally");
        return PathBuf::from(path);
    };

    let [word] = words.as_slice() else {
        debug!(path, words = words.len(), "Path did not expand to a single word, using it literally");
        return PathBuf::from(path);
    };

    if !word.has_glob {
        return PathBuf::from(&word.text);
    }

    match glob_single(&word.pattern) {
        GlobOutcome::Unchanged => PathBuf::from(&word.text),
        GlobOutcome::One(found) => found,
        GlobOutcome::Ambiguous(count) => {
            debug!(path, count, "Path glob matched several files, using it literally");
            PathBuf::from(path)
        }
    }
}

fn is_word_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// One field of an expanded path
#[derive(Debug, Default)]
struct Word {
    /// Quote-removed text
    text: String,
    /// The text in glob syntax, quoted wildcard characters escaped
    pattern: String,
    /// Contains an unquoted `*`, `?` or `[`
    has_glob: bool,
}

impl Word {
    fn push(&mut self, c: char, quoted: bool) {
        self.text.push(c);
        if !matches!(c, '*' | '?' | '[' | ']') {
            self.pattern.push(c);
        } else if quoted {
            self.pattern.push('[');
            self.pattern.push(c);
            self.pattern.push(']');
        } else {
            self.pattern.push(c);
            self.has_glob |= c != ']';
        }
    }

    fn push_str(&mut self, s: &str, quoted: bool) {
        for c in s.chars() {
            self.push(c, quoted);
        }
    }
}

#[derive(Default)]
struct Fields {
    words: Vec<Word>,
    current: Option<Word>,
}

impl Fields {
    /// The word being built, started if needed (so `''` yields an empty word)
    fn word(&mut self) -> &mut Word {
        self.current.get_or_insert_with(Word::default)
    }

    fn end_word(&mut self) {
        if let Some(word) = self.current.take() {
            self.words.push(word);
        }
    }

    /// Unquoted expansion result, subject to field splitting
    fn push_split(&mut self, s: &str) {
        for c in s.chars() {
            if is_word_separator(c) {
                self.end_word();
            } else {
                self.word().push(c, false);
            }
        }
    }
}

/// Split `path` into expanded words. `None` means the input uses syntax we do not handle.
fn split_words<F>(path: &str, lookup: &F) -> Option<Vec<Word>>
where
    F: Fn(&str) -> Option<String>,
{
    let chars: Vec<char> = path.chars().collect();
    let mut fields = Fields::default();
    let mut i = 0;

    if chars.first() == Some(&'~')
        && chars
            .get(1)
            .is_none_or(|&c| c == '/' || is_word_separator(c))
    {
        match lookup(HOME) {
            Some(home) => fields.word().push_str(&home, true),
            None => fields.word().push('~', false),
        }
        i = 1;
    }

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' => {
                fields.word().push(*chars.get(i + 1)?, true);
                i += 2;
            }
            '\'' => {
                let close = chars[i + 1..].iter().position(|&q| q == '\'')?;
                let word = fields.word();
                for &q in &chars[i + 1..i + 1 + close] {
                    word.push(q, true);
                }
                i += close + 2;
            }
            '"' => {
                fields.word();
                i += 1;
                loop {
                    match *chars.get(i)? {
                        '"' => {
                            i += 1;
                            break;
                        }
                        '\\' => {
                            let next = *chars.get(i + 1)?;
                            if !matches!(next, '$' | '`' | '"' | '\\') {
                                fields.word().push('\\', true);
                            }
                            fields.word().push(next, true);
                            i += 2;
                        }
                        '`' => return None,
                        '$' => {
                            let (value, next) = parameter(&chars, i, lookup)?;
                            fields.word().push_str(&value, true);
                            i = next;
                        }
                        q => {
                            fields.word().push(q, true);
                            i += 1;
                        }
                    }
                }
            }
            '$' => {
                let (value, next) = parameter(&chars, i, lookup)?;
                fields.push_split(&value);
                i = next;
            }
            c if UNSUPPORTED_CHARS.contains(&c) => return None,
            c if is_word_separator(c) => {
                fields.end_word();
                i += 1;
            }
            c => {
                fields.word().push(c, false);
                i += 1;
            }
        }
    }

    fields.end_word();
    Some(fields.words)
}

/// Expand the `$` at `chars[at]`. Returns the value and the index after the reference.
fn parameter<F>(chars: &[char], at: usize, lookup: &F) -> Option<(String, usize)>
where
    F: Fn(&str) -> Option<String>,
{
    match chars.get(at + 1) {
        Some('{') => {
            let close = chars[at + 2..].iter().position(|&c| c == '}')?;
            let name: String = chars[at + 2..at + 2 + close].iter().collect();
            if !is_var_name(&name) {
                return None;
            }
            Some((lookup(&name).unwrap_or_default(), at + close + 3))
        }
        Some('(') => None,
        _ => {
            let len = var_name_len(chars[at + 1..].iter().copied());
            if len == 0 {
                return Some(("$".to_string(), at + 1));
            }
            let name: String = chars[at + 1..at + 1 + len].iter().collect();
            Some((lookup(&name).unwrap_or_default(), at + 1 + len))
        }
    }
}

/// Length in characters of the variable name at the start of `chars`
fn var_name_len(chars: impl IntoIterator<Item = char>) -> usize {
    chars
        .into_iter()
        .enumerate()
        .take_while(|&(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()))
        .count()
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty() && var_name_len(name.chars()) == name.chars().count()
}

enum GlobOutcome {
    Unchanged,
    One(PathBuf),
    Ambiguous(usize),
}

fn glob_single(pattern: &str) -> GlobOutcome {
    let paths = match glob::glob(pattern) {
        Ok(paths) => paths,
        Err(e) => {
            debug!(pattern, error = %e, "Invalid glob in path");
            return GlobOutcome::Unchanged;
        }
    };

    let mut found: Vec<PathBuf> = paths.filter_map(|p| p.ok()).collect();
    match found.len() {
        0 => GlobOutcome::Unchanged,
        1 => GlobOutcome::One(found.remove(0)),
        n => GlobOutcome::Ambiguous(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vars(name: &str) -> Option<String> {
        match name {
            "HOME" => Some("/home/u".to_string()),
            "CONFIG_DIR" => Some("/etc/app".to_string()),
            "SPACED" => Some("a b".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_home_value() {
        assert_eq!(expand_home("~/data", Some("/home/u")), "/home/u/data");
        assert_eq!(expand_home("~", Some("/home/u")), "/home/u");
        assert_eq!(expand_home("~otheruser/data", Some("/home/u")), "~otheruser/data");
        assert_eq!(expand_home("data/~", Some("/home/u")), "data/~");
        assert_eq!(expand_home("", Some("/home/u")), "");
    }

    #[test]
    fn test_expand_home_without_home() {
        assert_eq!(expand_home("~/data", None), "~/data");
        assert_eq!(expand_home("~", None), "~");
    }

    #[test]
    fn test_path_tilde() {
        assert_eq!(
            expand_path_with("~/app.conf", vars),
            PathBuf::from("/home/u/app.conf")
        );
        assert_eq!(expand_path_with("~", vars), PathBuf::from("/home/u"));
        assert_eq!(
            expand_path_with("~bob/app.conf", vars),
            PathBuf::from("~bob/app.conf")
        );
    }

    #[test]
    fn test_path_tilde_without_home() {
        assert_eq!(
            expand_path_with("~/app.conf", |_| None),
            PathBuf::from("~/app.conf")
        );
    }

    #[test]
    fn test_path_variables() {
        assert_eq!(
            expand_path_with("$CONFIG_DIR/app.conf", vars),
            PathBuf::from("/etc/app/app.conf")
        );
        assert_eq!(
            expand_path_with("${CONFIG_DIR}/app.conf", vars),
            PathBuf::from("/etc/app/app.conf")
        );
        assert_eq!(
            expand_path_with("/tmp/$UNSET/app.conf", vars),
            PathBuf::from("/tmp//app.conf")
        );
        assert_eq!(expand_path_with("/tmp/a$", vars), PathBuf::from("/tmp/a$"));
    }

    #[test]
    fn test_path_falls_back_on_multiple_words() {
        assert_eq!(
            expand_path_with("/tmp/$SPACED", vars),
            PathBuf::from("/tmp/$SPACED")
        );
        assert_eq!(
            expand_path_with("my file.conf", vars),
            PathBuf::from("my file.conf")
        );
    }

    #[test]
    fn test_path_falls_back_on_zero_words() {
        assert_eq!(expand_path_with("$UNSET", vars), PathBuf::from("$UNSET"));
    }

    #[test]
    fn test_path_falls_back_on_unsupported_syntax() {
        assert_eq!(
            expand_path_with("$(whoami).conf", vars),
            PathBuf::from("$(whoami).conf")
        );
        assert_eq!(
            expand_path_with("${CONFIG_DIR", vars),
            PathBuf::from("${CONFIG_DIR")
        );
        assert_eq!(
            expand_path_with("'unterminated.conf", vars),
            PathBuf::from("'unterminated.conf")
        );
        assert_eq!(
            expand_path_with("\"unterminated.conf", vars),
            PathBuf::from("\"unterminated.conf")
        );
        assert_eq!(
            expand_path_with("a.conf|b", vars),
            PathBuf::from("a.conf|b")
        );
        assert_eq!(
            expand_path_with("trailing\\", vars),
            PathBuf::from("trailing\\")
        );
    }

    #[test]
    fn test_path_quoted_keeps_spaces() {
        assert_eq!(
            expand_path_with("\"/tmp/my file\"", vars),
            PathBuf::from("/tmp/my file")
        );
        assert_eq!(
            expand_path_with("'/tmp/my file'", vars),
            PathBuf::from("/tmp/my file")
        );
        assert_eq!(
            expand_path_with("/tmp/my\\ file", vars),
            PathBuf::from("/tmp/my file")
        );
        assert_eq!(
            expand_path_with("/tmp/'my file'.conf", vars),
            PathBuf::from("/tmp/my file.conf")
        );
    }

    #[test]
    fn test_path_quoted_variables() {
        assert_eq!(
            expand_path_with("\"$CONFIG_DIR/my app.conf\"", vars),
            PathBuf::from("/etc/app/my app.conf")
        );
        assert_eq!(
            expand_path_with("\"/tmp/$SPACED\"", vars),
            PathBuf::from("/tmp/a b")
        );
        assert_eq!(
            expand_path_with("'$CONFIG_DIR'", vars),
            PathBuf::from("$CONFIG_DIR")
        );
        assert_eq!(
            expand_path_with("\"a\\$b\\x\"", vars),
            PathBuf::from("a$b\\x")
        );
        assert_eq!(expand_path_with("\"$UNSET\"", vars), PathBuf::from(""));
    }

    #[test]
    fn test_path_quoted_glob_is_not_expanded() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("only.conf"), "a = 1\n").unwrap();

        let quoted = format!("\"{}/*.conf\"", dir.path().display());
        assert_eq!(
            expand_path_with(&quoted, |_| None),
            dir.path().join("*.conf")
        );

        let escaped = format!("{}/\\*.conf", dir.path().display());
        assert_eq!(
            expand_path_with(&escaped, |_| None),
            dir.path().join("*.conf")
        );
    }

    #[test]
    fn test_path_glob_single_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("only.conf"), "a = 1\n").unwrap();

        let pattern = format!("{}/*.conf", dir.path().display());
        assert_eq!(
            expand_path_with(&pattern, |_| None),
            dir.path().join("only.conf")
        );
    }

    #[test]
    fn test_path_glob_ambiguous_falls_back() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.conf"), "").unwrap();
        fs::write(dir.path().join("b.conf"), "").unwrap();

        let pattern = format!("{}/*.conf", dir.path().display());
        assert_eq!(expand_path_with(&pattern, |_| None), PathBuf::from(&pattern));
    }

    #[test]
    fn test_path_glob_no_match_keeps_word() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.conf", dir.path().display());
        assert_eq!(expand_path_with(&pattern, |_| None), PathBuf::from(&pattern));
    }

    #[test]
    fn test_var_name_len() {
        assert_eq!(var_name_len("HOME/x".chars()), 4);
        assert_eq!(var_name_len("_A1-".chars()), 3);
        assert_eq!(var_name_len("1abc".chars()), 0);
        assert!(is_var_name("CONFIG_DIR"));
        assert!(!is_var_name(""));
        assert!(!is_var_name("A-B"));
    }
}
