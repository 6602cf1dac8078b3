//! Configuration schema (ledgercheck.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::schema::SemanticType;

/// Schema inference settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum number of values sampled per column
    pub sample_size: usize,

    /// Below this confidence a column is reported as partial
    pub min_confidence: f64,

    /// Below this share of non-empty values a column is reported as partial
    pub min_fill_rate: f64,

    /// Share of samples a typed checker must explain to beat Text
    pub min_type_share: f64,

    /// Accepted date layouts (chrono `strftime` syntax)
    pub date_formats: Vec<String>,

    /// Columns whose plain numbers count as monetary amounts
    pub currency_columns: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 50,
            min_confidence: 0.8,
            min_fill_rate: 0.5,
            min_type_share: 0.5,
            date_formats: vec!["%Y-%m-%d".to_string()],
            currency_columns: ["ingreso", "gasto", "activo", "pasivo", "monto", "income", "expense", "amount"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl InferenceConfig {
    /// Check if a column holds monetary amounts by name
    pub fn is_currency_column(&self, column: &str) -> bool {
        self.currency_columns.iter().any(|c| c.eq_ignore_ascii_case(column))
    }
}

/// Record validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted absolute amount
    pub amount_ceiling: f64,

    /// Fields that may not be empty
    pub required_fields: Vec<String>,

    /// Fields where negative amounts are rejected
    pub non_negative_fields: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            amount_ceiling: 1e8,
            required_fields: Vec::new(),
            non_negative_fields: ["ingreso", "income", "amount", "monto"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ValidationConfig {
    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| f == field)
    }

    pub fn rejects_negative(&self, field: &str) -> bool {
        self.non_negative_fields.iter().any(|f| f.eq_ignore_ascii_case(field))
    }
}

/// Duplicate detection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Fields compared to decide row equivalence (empty means all columns)
    pub key_fields: Vec<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Columns the batch is expected to carry; absent ones are reported missing
    #[serde(default)]
    pub expected_columns: Vec<String>,

    /// Schema inference
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Record validation
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Duplicate detection
    #[serde(default)]
    pub duplicates: DuplicateConfig,

    /// Forced column types, bypassing inference
    #[serde(default)]
    pub columns: BTreeMap<String, SemanticType>,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.check()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Forced type for a column, if configured
    pub fn column_override(&self, column: &str) -> Option<SemanticType> {
        self.columns.get(column).copied()
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.inference.sample_size == 0 {
            return Err(ConfigError::InvalidValue("inference.sample_size must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.inference.min_confidence) {
            return Err(ConfigError::InvalidValue("inference.min_confidence must be within [0, 1]".to_string()));
        }
        if !(0.0..=1.0).contains(&self.inference.min_fill_rate) {
            return Err(ConfigError::InvalidValue("inference.min_fill_rate must be within [0, 1]".to_string()));
        }
        if !(0.0..=1.0).contains(&self.inference.min_type_share) {
            return Err(ConfigError::InvalidValue("inference.min_type_share must be within [0, 1]".to_string()));
        }
        if self.inference.date_formats.is_empty() {
            return Err(ConfigError::InvalidValue("inference.date_formats must not be empty".to_string()));
        }
        if self.validation.amount_ceiling.is_nan() || self.validation.amount_ceiling <= 0.0 {
            return Err(ConfigError::InvalidValue("validation.amount_ceiling must be positive".to_string()));
        }
        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.inference.sample_size, 50);
        assert_eq!(config.inference.min_type_share, 0.5);
        assert_eq!(config.validation.amount_ceiling, 1e8);
        assert!(config.duplicates.key_fields.is_empty());
        assert!(config.inference.is_currency_column("Ingreso"));
        assert!(config.validation.rejects_negative("ingreso"));
        assert!(!config.validation.rejects_negative("gasto"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            expected_columns = ["fecha", "categoria"]

            [validation]
            required_fields = ["activo"]

            [duplicates]
            key_fields = ["fecha", "ingreso"]

            [columns]
            kwh = "numeric"
            "#,
        )
        .unwrap();

        assert_eq!(config.expected_columns, vec!["fecha", "categoria"]);
        assert!(config.validation.is_required("activo"));
        assert_eq!(config.validation.amount_ceiling, 1e8);
        assert_eq!(config.inference.sample_size, 50);
        assert_eq!(config.column_override("kwh"), Some(SemanticType::Numeric));
        assert_eq!(config.column_override("fecha"), None);
    }

    #[test]
    fn rejects_zero_sample_size() {
        let err = Config::from_toml("[inference]\nsample_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn rejects_type_share_above_one() {
        let err = Config::from_toml("[inference]\nmin_type_share = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = Config::from_toml("[inference\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn save_to_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledgercheck.toml");

        let mut config = Config::default();
        config.expected_columns = vec!["fecha".to_string(), "categoria".to_string()];
        config.inference.min_type_share = 0.6;
        config.duplicates.key_fields = vec!["fecha".to_string(), "ingreso".to_string()];
        config.columns.insert("kwh".to_string(), SemanticType::Numeric);

        config.save_to_file(&path).unwrap();
        let loaded = Config::from_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
