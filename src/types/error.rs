//! Unified Error Type System
//!
//! One error enum for the whole crate. Lookup misses are not errors:
//! they surface as `None` or an empty `Vec`.
//!
//! ## Variants
//!
//! - **Open**: the configuration file could not be opened (carries the OS error)
//! - **Read**: an I/O error occurred after the file was opened
//! - **Allocation**: growing the store or a result list failed
//! - **MalformedLine**: a line without `=` (strict mode only)
//! - **Config**: invalid `LoadOptions`

use std::collections::TryReserveError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CupidError {
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Allocation failed while {context}")]
    Allocation {
        context: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("Malformed line {line}: missing '=' in {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CupidError>;

impl CupidError {
    pub(crate) fn allocation(context: &'static str, source: TryReserveError) -> Self {
        Self::Allocation { context, source }
    }

    /// Whether this error came from the operating system (open or read)
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::Read { .. })
    }

    /// Underlying OS error, if any
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            Self::Open { source, .. } | Self::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
