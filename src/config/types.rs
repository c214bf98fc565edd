//! Load Option Types
//!
//! Knobs for the line parser, with defaults matching the classic
//! lenient behaviour.

use serde::{Deserialize, Serialize};

use crate::constants::parse::{MAX_LINE_BYTES, MIN_LINE_BYTES};
use crate::types::{CupidError, Result};

/// How lines without a `=` separator are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Skip malformed lines silently
    #[default]
    Lenient,
    /// Fail the whole load on the first malformed line
    Strict,
}

/// Options for `ConfigStore::load_with` and `ConfigStore::from_reader`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Malformed line handling
    pub mode: ParseMode,

    /// Physical line limit in bytes, terminator included
    pub max_line_bytes: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::Lenient,
            max_line_bytes: MAX_LINE_BYTES,
        }
    }
}

impl LoadOptions {
    pub fn strict() -> Self {
        Self {
            mode: ParseMode::Strict,
            ..Self::default()
        }
    }

    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    /// Returns `CupidError::Config` when a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.max_line_bytes < MIN_LINE_BYTES {
            return Err(CupidError::Config(format!(
                "max_line_bytes must be at least {}, got {}",
                MIN_LINE_BYTES, self.max_line_bytes
            )));
        }
        Ok(())
    }

    /// Longest line content kept, in bytes (the limit minus the terminator)
    pub fn max_content_bytes(&self) -> usize {
        self.max_line_bytes.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = LoadOptions::default();
        assert_eq!(options.mode, ParseMode::Lenient);
        assert_eq!(options.max_line_bytes, 1024);
        assert_eq!(options.max_content_bytes(), 1023);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_strict_builder() {
        let options = LoadOptions::strict().with_max_line_bytes(64);
        assert_eq!(options.mode, ParseMode::Strict);
        assert_eq!(options.max_line_bytes, 64);
    }

    #[test]
    fn test_validate_rejects_tiny_limit() {
        let err = LoadOptions::default()
            .with_max_line_bytes(1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CupidError::Config(_)));
        assert!(err.to_string().contains("max_line_bytes"));
    }
}
