//! Indexing configuration.

use crate::compute::validation::validate_precision;
use log::warn;
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Parameters for building an index from polygon features.
///
/// # Example
///
/// ```rust
/// use geohash_tree::IndexConfig;
///
/// let config = IndexConfig::default().with_precision(2, 6);
/// assert!(config.validate().is_ok());
///
/// let json = r#"{ "min_precision": 4, "max_precision": 7, "id_field": "GEOID" }"#;
/// let config = IndexConfig::from_json(json).unwrap();
/// assert_eq!(config.batch_size, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Shortest geohash in the index (1-12, default: 3)
    #[serde(default = "IndexConfig::default_min_precision")]
    pub min_precision: usize,

    /// Longest geohash in the index (min-12, default: 8).
    /// Each extra level multiplies boundary cells by roughly 5.
    #[serde(default = "IndexConfig::default_max_precision")]
    pub max_precision: usize,

    /// Number of features indexed concurrently before their records are written.
    #[serde(default = "IndexConfig::default_batch_size")]
    pub batch_size: usize,

    /// Feature property holding the polygon id.
    #[serde(default = "IndexConfig::default_id_field")]
    pub id_field: String,
}

impl IndexConfig {
    const fn default_min_precision() -> usize {
        3
    }

    const fn default_max_precision() -> usize {
        8
    }

    const fn default_batch_size() -> usize {
        2
    }

    fn default_id_field() -> String {
        "id".to_string()
    }

    pub fn with_precision(mut self, min_precision: usize, max_precision: usize) -> Self {
        self.min_precision = min_precision;
        self.max_precision = max_precision;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_id_field(mut self, id_field: impl Into<String>) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        validate_precision(self.min_precision, self.max_precision).map_err(|e| e.to_string())?;

        if self.batch_size == 0 {
            return Err("Batch size must be greater than zero".to_string());
        }

        if self.id_field.is_empty() {
            return Err("Id field must not be empty".to_string());
        }

        if self.max_precision > 9 {
            warn!(
                "Max precision {} produces very large indexes",
                self.max_precision
            );
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: IndexConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: IndexConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            min_precision: Self::default_min_precision(),
            max_precision: Self::default_max_precision(),
            batch_size: Self::default_batch_size(),
            id_field: Self::default_id_field(),
        }
    }
}
