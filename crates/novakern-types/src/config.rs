//! Kernel configuration.
//!
//! Loaded from a TOML file at startup when one exists; every field has a
//! default so a missing or partial file is never fatal.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Top-level kernel configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Host name shown in shell prompts.
    pub hostname: String,
    /// Name of the user the kernel starts with.
    pub current_user: String,
    /// Prompt preset selected for the main shell.
    pub prompt_preset: String,
    /// Maximum number of history entries each shell retains.
    pub history_limit: usize,
    /// BCP 47 locale tag handed to the translation layer.
    pub locale: String,
    /// When set, commands not flagged for maintenance use are refused.
    pub maintenance: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            hostname: "novakern".to_string(),
            current_user: "root".to_string(),
            prompt_preset: "default".to_string(),
            history_limit: 100,
            locale: "en-US".to_string(),
            maintenance: false,
        }
    }
}

impl KernelConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file, falling back to defaults if it is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}
