//! Configuration Module
//!
//! Optional TOML configuration for embedding layers. Lets a capture layer
//! assign size-math categories to formats the built-in table doesn't know.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::format::{classify, DxgiFormat, FormatCategory};

/// Category assignment for one raw `DXGI_FORMAT` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOverride {
    pub format: u32,
    pub category: FormatCategory,
}

/// Calculator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Checked before the built-in table. Later entries win.
    #[serde(default)]
    pub format_overrides: Vec<FormatOverride>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Classify `format`, honouring overrides.
    pub fn classify(&self, format: DxgiFormat) -> FormatCategory {
        self.format_overrides
            .iter()
            .rev()
            .find(|o| o.format == format.0)
            .map(|o| o.category)
            .unwrap_or_else(|| classify(format))
    }
}
