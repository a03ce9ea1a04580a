//! Engine configuration via `canopy.toml`
//!
//! A small config file read once at startup. Missing fields fall back to
//! their defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use canopy_core::{timeout_factory, CanopyError, CanopyResult, TimeoutFactory};

/// Config file name looked up by deployments.
pub const CONFIG_FILE_NAME: &str = "canopy.toml";

fn default_request_timeout_ms() -> u64 {
    5000
}

/// Engine configuration loaded from `canopy.toml`.
///
/// # Example
///
/// ```toml
/// # Deadline for each CRUD call (reads and commit), in milliseconds
/// request_timeout_ms = 5000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deadline applied to every CRUD call.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl EngineConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Canopy engine configuration
#
# Deadline for each CRUD call (plain reads and the commit), in milliseconds.
request_timeout_ms = 5000
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be parsed or fails validation.
    pub fn from_toml_str(content: &str) -> CanopyResult<Self> {
        let config: EngineConfig = toml::from_str(content).map_err(|e| {
            CanopyError::invalid_input(format!("Failed to parse engine config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> CanopyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CanopyError::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CanopyError::InvalidInput(msg) => {
                CanopyError::invalid_input(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> CanopyResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                CanopyError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// A zero timeout is invalid input.
    pub fn validate(&self) -> CanopyResult<()> {
        if self.request_timeout_ms == 0 {
            return Err(CanopyError::invalid_input(
                "request_timeout_ms must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Per-call deadline duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Deadline factory for [`CrudOperation`](crate::CrudOperation).
    pub fn timeout(&self) -> TimeoutFactory {
        timeout_factory(self.request_timeout())
    }
}
