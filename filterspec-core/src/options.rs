//! Specification options and the `filterspec.toml` loader.
//!
//! ```toml
//! [specification]
//! disable_property_auto_handling = false
//! log_fragments = true
//! ```
//!
//! `FILTERSPEC_DISABLE_AUTO_HANDLING` overrides the file when set.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{SpecError, SpecResult};

/// Overrides `disable_property_auto_handling`.
pub const DISABLE_AUTO_HANDLING_ENV: &str = "FILTERSPEC_DISABLE_AUTO_HANDLING";

/// Options shared by every specification of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecOptions {
    /// Only explicit field handlers produce fragments; convention-mapped
    /// fields are skipped. Unmapped fields are still reported.
    pub disable_property_auto_handling: bool,

    /// Log each created filter query at debug level.
    pub log_fragments: bool,
}

impl SpecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `disable_property_auto_handling`.
    pub fn auto_handling_disabled(mut self, disabled: bool) -> Self {
        self.disable_property_auto_handling = disabled;
        self
    }

    /// Set `log_fragments`.
    pub fn fragment_logging(mut self, enabled: bool) -> Self {
        self.log_fragments = enabled;
        self
    }

    /// Apply environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(disabled) = env_flag(DISABLE_AUTO_HANDLING_ENV) {
            self.disable_property_auto_handling = disabled;
        }
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = env::var(name).ok()?;
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Contents of a `filterspec.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SpecConfig {
    /// The `[specification]` table.
    #[serde(default)]
    pub specification: SpecOptions,
}

impl SpecConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> SpecResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SpecError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SpecResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Specification options with environment overrides applied.
    pub fn options(&self) -> SpecOptions {
        self.specification.clone().with_env_overrides()
    }
}
