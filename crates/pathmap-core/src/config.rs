//! Mapper configuration
//!
//! Configuration is layered the usual way:
//! - Default values
//! - Configuration files (TOML/JSON)
//! - Environment variables (`PATHMAP_*`)
//!
//! The tag vocabulary names the annotation keys and the reserved tokens the
//! annotation reader recognizes; the numeric mode selects how integer
//! narrowing treats values outside the destination width.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding the mapping annotation key
pub const ENV_MAPPING_TAG: &str = "PATHMAP_MAPPING_TAG";
/// Environment variable overriding the name annotation key
pub const ENV_NAME_TAG: &str = "PATHMAP_NAME_TAG";
/// Environment variable overriding the numeric mode
pub const ENV_NUMERIC_MODE: &str = "PATHMAP_NUMERIC_MODE";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Annotation keys and reserved tokens
    pub tags: TagVocabulary,

    /// Integer narrowing policy
    pub numeric: NumericMode,
}

/// Annotation keys and the tokens with reserved meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagVocabulary {
    /// Key of the mapping-path annotation
    pub mapping: String,

    /// Key of the serialization-name annotation
    pub name: String,

    /// Token that drops empty values
    pub omit_empty: String,

    /// Token that forces string rendering
    pub as_string: String,
}

/// How integer coercion treats values that do not fit the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    /// Wrap silently, like an `as` cast
    #[default]
    Truncate,
    /// Fail with a numeric overflow error
    Checked,
}

impl Default for TagVocabulary {
    fn default() -> Self {
        Self {
            mapping: "mapper".to_string(),
            name: "json".to_string(),
            omit_empty: "omitempty".to_string(),
            as_string: "string".to_string(),
        }
    }
}

impl fmt::Display for NumericMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericMode::Truncate => write!(f, "truncate"),
            NumericMode::Checked => write!(f, "checked"),
        }
    }
}

impl FromStr for NumericMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(NumericMode::Truncate),
            "checked" => Ok(NumericMode::Checked),
            other => Err(Error::Configuration {
                message: format!("Unknown numeric mode '{}' (expected truncate or checked)", other),
                source: None,
            }),
        }
    }
}

impl MapperConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| Error::Configuration {
            message: "Failed to parse TOML configuration".to_string(),
            source: Some(anyhow::Error::new(e)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).map_err(|e| Error::Configuration {
            message: "Failed to parse JSON configuration".to_string(),
            source: Some(anyhow::Error::new(e)),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::Configuration {
                message: format!("Unsupported configuration file: {}", path.display()),
                source: None,
            }),
        }
    }

    /// Apply `PATHMAP_*` environment overrides
    pub fn merge_with_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tag) = lookup(ENV_MAPPING_TAG).filter(|t| !t.trim().is_empty()) {
            self.tags.mapping = tag.trim().to_string();
        }

        if let Some(tag) = lookup(ENV_NAME_TAG).filter(|t| !t.trim().is_empty()) {
            self.tags.name = tag.trim().to_string();
        }

        if let Some(mode) = lookup(ENV_NUMERIC_MODE) {
            match mode.parse() {
                Ok(mode) => self.numeric = mode,
                Err(_) => tracing::warn!("Invalid numeric mode: {}, keeping {}", mode, self.numeric),
            }
        }
    }

    /// Check that the vocabulary is usable
    pub fn validate(&self) -> Result<()> {
        let tags = &self.tags;
        for (what, token) in [
            ("mapping", &tags.mapping),
            ("name", &tags.name),
            ("omit_empty", &tags.omit_empty),
            ("as_string", &tags.as_string),
        ] {
            if token.is_empty() || token.contains(',') || token.contains(char::is_whitespace) {
                return Err(Error::Configuration {
                    message: format!("Tag vocabulary entry '{}' is invalid: {:?}", what, token),
                    source: None,
                });
            }
        }

        if tags.mapping == tags.name {
            return Err(Error::Configuration {
                message: format!("Mapping and name annotations share the key '{}'", tags.mapping),
                source: None,
            });
        }
        if tags.omit_empty == tags.as_string {
            return Err(Error::Configuration {
                message: format!("Reserved tokens collide on '{}'", tags.omit_empty),
                source: None,
            });
        }

        Ok(())
    }
}
