//! Configuration structures for the recovery pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RecoupError, Result};

/// Main configuration for the recoup pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoupConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Validation configuration.
    pub validation: ValidationConfig,

    /// Engine routing configuration.
    pub routing: RoutingConfig,
}

impl Default for RecoupConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            validation: ValidationConfig::default(),
            routing: RoutingConfig::default(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Repair malformed invoice identifiers (INVI prefix, missing slash).
    pub repair_invoice_ids: bool,

    /// Log a text correction when a tax value appears without its % sign.
    pub restore_tax_percent: bool,

    /// Lowercase quantity markers such as `X1.0` in the normalized text.
    pub normalize_quantities: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            repair_invoice_ids: true,
            restore_tax_percent: true,
            normalize_quantities: true,
        }
    }
}

/// Validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Absolute tolerance for arithmetic closeness checks.
    pub tolerance: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { tolerance: 0.01 }
    }
}

/// Engine routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Minimum classifier confidence before falling back to the default engine.
    pub min_confidence: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
        }
    }
}

impl RecoupConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RecoupError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RecoupConfig::default();

        assert!(config.extraction.repair_invoice_ids);
        assert!(config.extraction.normalize_quantities);
        assert_eq!(config.validation.tolerance, 0.01);
        assert_eq!(config.routing.min_confidence, 0.5);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: RecoupConfig =
            serde_json::from_str(r#"{"validation": {"tolerance": 0.05}}"#).unwrap();

        assert_eq!(config.validation.tolerance, 0.05);
        assert!(config.extraction.repair_invoice_ids);
        assert_eq!(config.routing.min_confidence, 0.5);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RecoupConfig::default();
        config.extraction.normalize_quantities = false;
        config.validation.tolerance = 0.02;
        config.save(&path).unwrap();

        let loaded = RecoupConfig::from_file(&path).unwrap();
        assert!(!loaded.extraction.normalize_quantities);
        assert_eq!(loaded.validation.tolerance, 0.02);
    }

    #[test]
    fn test_from_file_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(RecoupConfig::from_file(&path).is_err());
    }
}
