//! Store Loading
//!
//! Reads physical lines from any `BufRead`, classifies them, expands
//! values and appends entries in file order.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::ConfigStore;
use crate::config::{LoadOptions, ParseMode};
use crate::constants::env::HOME;
use crate::parser::line::truncate_line;
use crate::parser::{Line, classify, expand_home, expand_path};
use crate::types::{CupidError, Entry, Result};

/// Origin label used in read errors for non-file sources
const READER_ORIGIN: &str = "<reader>";

impl ConfigStore {
    /// Load a configuration file with default options.
    ///
    /// The path goes through word expansion first (`~`, `$VAR`, globs);
    /// if that does not give exactly one path the literal string is opened.
    pub fn load(path: impl AsRef<str>) -> Result<Self> {
        Self::load_with(path, &LoadOptions::default())
    }

    pub fn load_with(path: impl AsRef<str>, options: &LoadOptions) -> Result<Self> {
        options.validate()?;

        let literal = path.as_ref();
        let resolved = expand_path(literal);
        debug!(path = literal, resolved = %resolved.display(), "Loading config");

        let file = File::open(&resolved).map_err(|source| {
            warn!(path = %resolved.display(), error = %source, "Failed to open config");
            CupidError::Open {
                path: resolved.clone(),
                source,
            }
        })?;

        let home = env::var(HOME).ok();
        let mut store = parse(BufReader::new(file), options, home.as_deref(), &resolved)?;
        store.source = Some(resolved);
        Ok(store)
    }

    /// Parse from any buffered reader, expanding `~` against the current `HOME`.
    pub fn from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<Self> {
        options.validate()?;
        let home = env::var(HOME).ok();
        parse(reader, options, home.as_deref(), Path::new(READER_ORIGIN))
    }

    /// Parse in-memory text with default options.
    pub fn parse_str(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes(), &LoadOptions::default())
    }
}

/// The line pipeline. `home` is read once by the caller so every line sees the same value.
pub(crate) fn parse<R: BufRead>(
    mut reader: R,
    options: &LoadOptions,
    home: Option<&str>,
    origin: &Path,
) -> Result<ConfigStore> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();
    let mut line_no = 0usize;
    let mut skipped = 0usize;
    let max_content = options.max_content_bytes();

    loop {
        buf.clear();
        let line = read_capped_line(&mut reader, &mut buf, max_content).map_err(|source| {
            CupidError::Read {
                path: PathBuf::from(origin),
                source,
            }
        })?;
        let Some(truncated) = line else {
            break;
        };
        line_no += 1;

        if truncated {
            trim_partial_char(&mut buf);
            trace!(line = line_no, kept = buf.len(), "Truncated overlong line");
        }
        let text = String::from_utf8_lossy(&buf);
        // Lossy replacement can grow the text past the limit
        let raw = truncate_line(&text, max_content);

        match classify(raw) {
            Line::Blank | Line::Comment => {}
            Line::Malformed(content) => match options.mode {
                ParseMode::Lenient => {
                    trace!(line = line_no, content, "Skipping line without '='");
                    skipped += 1;
                }
                ParseMode::Strict => {
                    return Err(CupidError::MalformedLine {
                        line: line_no,
                        content: content.to_string(),
                    });
                }
            },
            Line::Pair { key, value } => {
                let value = expand_home(value, home).into_owned();
                // Only list growth is fallible; key and value are bounded by the line limit
                entries
                    .try_reserve(1)
                    .map_err(|e| CupidError::allocation("growing the entry list", e))?;
                entries.push(Entry::new(key, value));
            }
        }
    }

    debug!(
        origin = %origin.display(),
        lines = line_no,
        entries = entries.len(),
        skipped,
        "Parsed config"
    );

    Ok(ConfigStore {
        entries,
        source: None,
    })
}

/// Read one physical line into `buf`, keeping at most `limit` bytes and
/// discarding the rest up to and including the `\n`.
///
/// Returns `None` at end of input, otherwise whether the line was cut.
fn read_capped_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    limit: usize,
) -> io::Result<Option<bool>> {
    let mut seen = false;
    let mut truncated = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(seen.then_some(truncated));
        }
        seen = true;

        let newline = available.iter().position(|&b| b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];
        let room = limit.saturating_sub(buf.len());
        if chunk.len() > room {
            truncated = true;
        }
        buf.extend_from_slice(&chunk[..chunk.len().min(room)]);

        let used = newline.map_or(available.len(), |i| i + 1);
        reader.consume(used);
        if newline.is_some() {
            return Ok(Some(truncated));
        }
    }
}

/// Drop an incomplete UTF-8 sequence left at the end of a cut line.
fn trim_partial_char(buf: &mut Vec<u8>) {
    if let Err(e) = std::str::from_utf8(buf)
        && e.error_len().is_none()
    {
        buf.truncate(e.valid_up_to());
    }
}
