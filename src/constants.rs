//! Global Constants
//!
//! Centralized constants for parsing and expansion.

/// Line parsing constants
pub mod parse {
    /// Maximum physical line length in bytes, terminator included.
    /// Anything past `MAX_LINE_BYTES - 1` content bytes is dropped.
    pub const MAX_LINE_BYTES: usize = 1024;

    /// Smallest accepted line limit (one content byte plus terminator)
    pub const MIN_LINE_BYTES: usize = 2;

    /// Characters that start a full-line or inline comment
    pub const COMMENT_MARKERS: [char; 2] = ['#', ';'];

    /// Key/value separator
    pub const SEPARATOR: char = '=';
}

/// Environment variable names
pub mod env {
    /// Home directory used for `~` expansion
    pub const HOME: &str = "HOME";

    /// Prefix for `LoadOptions` overrides (e.g. `CUPIDCONF_MODE=strict`)
    pub const OPTIONS_PREFIX: &str = "CUPIDCONF_";
}
