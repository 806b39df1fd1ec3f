//! Configuration for `avatar-parts.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `[canvas]`   | Fixed canvas of every exported part             |
//! | `[metadata]` | Provenance URL embedded in the metadata block   |
//! | `[index]`    | Root folder scanned by the index generator      |
//!
//! The file is optional. A missing file yields [`PartsConfig::default`].

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "avatar-parts.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing avatar-parts.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartsConfig {
    /// Canvas dimensions of the generated documents
    pub canvas: CanvasConfig,

    /// Metadata block constants
    pub metadata: MetadataConfig,

    /// Index generator settings
    pub index: IndexConfig,
}

/// `[canvas]` section.
///
/// Every part of an asset family shares one canvas, so the size is a
/// per-run constant rather than derived from the extracted layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Width and height of the square canvas, in `unit`.
    pub size: f64,
    /// Unit suffix for `width`/`height` (e.g. "mm").
    pub unit: String,
    /// `id` attribute of the generated root element.
    pub id: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: 124.19042,
            unit: "mm".into(),
            id: "svg151".into(),
        }
    }
}

/// `[metadata]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Provenance URL stored as `dc:source`.
    pub source: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            source: "https://github.com/profile-generators/avatar-parts".into(),
        }
    }
}

/// `[index]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Folder holding one sub-folder per category.
    pub root: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("parts"),
        }
    }
}

impl PartsConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Parse and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.canvas.size.is_finite() || self.canvas.size <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "canvas.size must be a positive number, got {}",
                self.canvas.size
            )));
        }
        if self.canvas.unit.trim().is_empty() {
            return Err(ConfigError::Validation("canvas.unit must not be empty".into()));
        }
        if self.metadata.source.trim().is_empty() {
            return Err(ConfigError::Validation(
                "metadata.source must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = PartsConfig::load(&temp.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.canvas.size, 124.19042);
        assert_eq!(config.canvas.unit, "mm");
        assert_eq!(config.index.root, PathBuf::from("parts"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[canvas]\nsize = 64.0\n").unwrap();

        let config = PartsConfig::load(&path).unwrap();
        assert_eq!(config.canvas.size, 64.0);
        assert_eq!(config.canvas.id, "svg151");
        assert_eq!(
            config.metadata.source,
            "https://github.com/profile-generators/avatar-parts"
        );
    }

    #[test]
    fn test_rejects_non_positive_size() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[canvas]\nsize = 0.0\n").unwrap();

        let err = PartsConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_rejects_unknown_key() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "[canvas]\nwidth = 10.0\n").unwrap();

        let err = PartsConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
