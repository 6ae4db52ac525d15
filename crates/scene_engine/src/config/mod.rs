//! Configuration system
//!
//! Every config struct is `#[serde(default)]`, so a file only needs the keys
//! it wants to change.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-backed configuration
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Parse an in-memory TOML document
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value parsed but makes no sense
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending key
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Registry construction settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Entity slots reserved up front
    pub initial_entity_capacity: usize,

    /// Trip a debug assertion when a lenient mutation targets a dead entity
    pub strict_liveness_checks: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_entity_capacity: 1024,
            strict_liveness_checks: cfg!(debug_assertions),
        }
    }
}

/// Reserved values of the integer selection buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Value the selection buffer is cleared to
    pub background_id: i32,

    /// Values written by the X, Y and Z translation gizmo arrows
    pub gizmo_ids: [i32; 3],
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            background_id: -1,
            gizmo_ids: [-2, -3, -4],
        }
    }
}

impl PickingConfig {
    /// Reserved ids must be negative and distinct
    ///
    /// Non-negative values are entity indices and cannot be reserved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut reserved = vec![self.background_id];
        reserved.extend_from_slice(&self.gizmo_ids);

        if let Some(id) = reserved.iter().find(|&&id| id >= 0) {
            return Err(ConfigError::Invalid {
                field: "picking",
                reason: format!("reserved id {id} collides with entity indices"),
            });
        }

        reserved.sort_unstable();
        if reserved.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ConfigError::Invalid {
                field: "picking",
                reason: "reserved ids must be distinct".to_string(),
            });
        }
        Ok(())
    }
}

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset
    pub log_filter: String,

    /// Registry settings
    pub registry: RegistryConfig,

    /// Selection buffer settings
    pub picking: PickingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            registry: RegistryConfig::default(),
            picking: PickingConfig::default(),
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.picking.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            log_filter = "scene_engine=trace"

            [registry]
            initial_entity_capacity = 16
            "#,
        )
        .unwrap();

        assert_eq!(config.log_filter, "scene_engine=trace");
        assert_eq!(config.registry.initial_entity_capacity, 16);
        assert_eq!(
            config.registry.strict_liveness_checks,
            RegistryConfig::default().strict_liveness_checks
        );
        assert_eq!(config.picking, PickingConfig::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("registry = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_picking_validation() {
        assert!(PickingConfig::default().validate().is_ok());

        let colliding = PickingConfig {
            background_id: -1,
            gizmo_ids: [-2, -2, -4],
        };
        assert!(matches!(colliding.validate(), Err(ConfigError::Invalid { .. })));

        let non_negative = PickingConfig {
            background_id: 0,
            gizmo_ids: [-2, -3, -4],
        };
        assert!(non_negative.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!("scene_engine_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut config = EngineConfig::default();
        config.registry.initial_entity_capacity = 77;
        config.picking.gizmo_ids = [-10, -11, -12];

        for name in ["engine.toml", "engine.ron"] {
            let path = dir.join(name);
            config.save_to_file(&path).unwrap();
            let loaded = EngineConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config);
        }

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unsupported_extension() {
        let err = EngineConfig::default().save_to_file("engine.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
