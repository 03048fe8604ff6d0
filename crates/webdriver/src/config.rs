use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DriverError, Result};

/// Names the driver to build and carries its pass-through settings.
///
/// The `kind` field must match a name registered in a
/// [`DriverRegistry`](crate::DriverRegistry); `capabilities` is opaque
/// to this crate and handed to the transport factory as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Registered driver name, e.g. `"firefox"` or `"firefox_sync"`.
    pub kind: String,

    /// Driver-specific capabilities forwarded to the factory.
    #[serde(default)]
    pub capabilities: serde_json::Map<String, Value>,
}

impl DriverConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            capabilities: serde_json::Map::new(),
        }
    }

    /// Adds one capability, replacing any previous value under the same key.
    pub fn with_capability(mut self, key: impl Into<String>, value: Value) -> Self {
        self.capabilities.insert(key.into(), value);
        self
    }

    pub fn capability(&self, key: &str) -> Option<&Value> {
        self.capabilities.get(key)
    }

    /// Checks the config before any registry lookup happens.
    pub fn validate(&self) -> Result<()> {
        if self.kind.trim().is_empty() {
            return Err(DriverError::invalid_config("driver kind must not be empty"));
        }
        Ok(())
    }

    /// Loads and validates a config from a TOML file.
    pub fn from_toml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)
            .map_err(|err| DriverError::invalid_config(format!("{}: {err}", path.display())))?;
        config.validate()?;
        log::debug!("loaded driver config '{}' from {}", config.kind, path.display());
        Ok(config)
    }
}
