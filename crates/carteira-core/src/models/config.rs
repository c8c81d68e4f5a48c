//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{CarteiraError, Result};

/// Main configuration for the carteira pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarteiraConfig {
    /// Document type detection configuration.
    pub detection: DetectionConfig,

    /// Field extraction and confidence configuration.
    pub extraction: ExtractionConfig,
}

/// Document type detector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Distinct signature hits a category needs before it can be selected.
    pub min_hits: usize,

    /// Confidence before any hit is counted.
    pub base_confidence: f32,

    /// Confidence added per signature hit.
    pub hit_increment: f32,

    /// Upper bound on detection confidence (kept below 1.0).
    pub confidence_cap: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_hits: 2,
            base_confidence: 0.4,
            hit_increment: 0.1,
            confidence_cap: 0.95,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Results at or above this confidence are accepted without review.
    pub accept_threshold: f32,

    /// Confidence ceiling applied when a required field is missing.
    pub required_missing_cap: f32,

    /// Weight of the category-detection confidence.
    pub category_weight: f32,

    /// Weight of the issuer-selection confidence.
    pub issuer_weight: f32,

    /// Weight of the fraction of expected fields populated.
    pub fill_weight: f32,

    /// Multiplier applied to field confidences from the generic extractor.
    pub generic_penalty: f32,

    /// Enable CPF and CNS checksum validation.
    pub validate_checksums: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            accept_threshold: 0.5,
            required_missing_cap: 0.49,
            category_weight: 0.3,
            issuer_weight: 0.3,
            fill_weight: 0.4,
            generic_penalty: 0.8,
            validate_checksums: true,
        }
    }
}

impl CarteiraConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let d = &self.detection;
        let e = &self.extraction;

        if d.min_hits == 0 {
            return Err(CarteiraError::Config("detection.min_hits must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&d.confidence_cap) {
            return Err(CarteiraError::Config(
                "detection.confidence_cap must be in [0, 1)".into(),
            ));
        }
        for (name, value) in [
            ("extraction.accept_threshold", e.accept_threshold),
            ("extraction.required_missing_cap", e.required_missing_cap),
            ("extraction.generic_penalty", e.generic_penalty),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CarteiraError::Config(format!("{name} must be in [0, 1]")));
            }
        }
        if e.required_missing_cap >= e.accept_threshold {
            return Err(CarteiraError::Config(
                "extraction.required_missing_cap must be below extraction.accept_threshold".into(),
            ));
        }
        let weights = e.category_weight + e.issuer_weight + e.fill_weight;
        if weights <= 0.0 || [e.category_weight, e.issuer_weight, e.fill_weight].iter().any(|w| *w < 0.0) {
            return Err(CarteiraError::Config(
                "extraction weights must be non-negative and not all zero".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CarteiraConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CarteiraConfig =
            serde_json::from_str(r#"{"detection": {"min_hits": 3}}"#).unwrap();
        assert_eq!(config.detection.min_hits, 3);
        assert_eq!(config.detection.hit_increment, 0.1);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_cap_must_stay_below_threshold() {
        let mut config = CarteiraConfig::default();
        config.extraction.required_missing_cap = 0.6;
        assert!(matches!(config.validate(), Err(CarteiraError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CarteiraConfig::default();
        config.extraction.accept_threshold = 0.6;
        config.save(&path).unwrap();

        assert_eq!(CarteiraConfig::from_file(&path).unwrap(), config);
    }
}
