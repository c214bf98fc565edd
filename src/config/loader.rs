//! Options Loader (Figment-based)
//!
//! Resolves `LoadOptions` from:
//! 1. Built-in defaults (Serialized)
//! 2. Environment variables (CUPIDCONF_* prefix)

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use tracing::debug;

use super::types::LoadOptions;
use crate::constants::env::OPTIONS_PREFIX;
use crate::types::{CupidError, Result};

/// Load options loader
pub struct OptionsLoader;

impl OptionsLoader {
    /// Defaults overridden by `CUPIDCONF_MODE` / `CUPIDCONF_MAX_LINE_BYTES`
    pub fn load() -> Result<LoadOptions> {
        Self::extract(Self::figment())
    }

    /// The provider chain, exposed so callers can merge their own sources on top
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(LoadOptions::default()))
            .merge(Env::prefixed(OPTIONS_PREFIX).lowercase(true))
    }

    /// Extract and validate options from an arbitrary figment
    pub fn extract(figment: Figment) -> Result<LoadOptions> {
        let options: LoadOptions = figment
            .extract()
            .map_err(|e| CupidError::Config(format!("Invalid load options: {}", e)))?;

        options.validate()?;
        debug!(
            mode = ?options.mode,
            max_line_bytes = options.max_line_bytes,
            "Resolved load options"
        );

        Ok(options)
    }
}

impl LoadOptions {
    /// Shorthand for [`OptionsLoader::load`]
    pub fn from_env() -> Result<Self> {
        OptionsLoader::load()
    }
}
