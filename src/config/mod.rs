//! Load Configuration
//!
//! Options controlling how configuration files are parsed:
//! 1. Built-in defaults
//! 2. Environment variables (CUPIDCONF_*)
//! 3. Explicit `LoadOptions` passed by the caller

mod loader;
mod types;

pub use loader::OptionsLoader;
pub use types::*;
