//! cupidconf - Flat Key/Value Configuration with Wildcard Lookups
//!
//! Loads `key = value` files (no sections) into an in-memory store and
//! answers lookups in two directions:
//!
//! - the *query key* is a shell wildcard matched against stored keys
//!   ([`ConfigStore::get`], [`ConfigStore::get_list`])
//! - the *stored value* is a shell wildcard matched against a query value
//!   ([`ConfigStore::value_in_list`])
//!
//! ## File Format
//!
//! ```text
//! # full-line comment
//! ; also a comment
//! data_dir = ~/data        # inline comment, `~` expands to $HOME
//! ignore   = *.txt
//! ignore   = build_*
//! ```
//!
//! Duplicate keys are kept; the last occurrence wins single-value lookups.
//! Lines without `=` are skipped unless [`ParseMode::Strict`] is used.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cupidconf::ConfigStore;
//!
//! let store = ConfigStore::load("~/.config/app.conf")?;
//! let dir = store.get("data_dir");
//! let skip = store.value_in_list("ignore", "notes.txt");
//! ```
//!
//! ## Modules
//!
//! - [`store`]: the store, loading and lookups
//! - [`parser`]: line classification, tilde and path expansion
//! - [`matcher`]: wildcard matching with a fixed flag set
//! - [`config`]: load options, including `CUPIDCONF_*` environment overrides

pub mod config;
pub mod constants;
pub mod matcher;
pub mod parser;
pub mod store;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{LoadOptions, OptionsLoader, ParseMode};
pub use matcher::{MATCH_OPTIONS, Wildcard, wildcard_match};
pub use store::ConfigStore;
pub use types::{CupidError, Entry, Result};
