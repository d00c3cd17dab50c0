//! Index configuration.
//!
//! Loaded from JSON (or TOML with the `toml` feature), with per-field
//! defaults so partial documents are accepted.
use crate::compute::geocell::MAX_RESOLUTION;
use crate::error::{GeocellError, Result};
use serde::de::Error;
use std::path::Path;

const FINE_RESOLUTION_WARNING: usize = 16;

/// Configuration for a [`GeoIndex`](crate::db::GeoIndex).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Resolution at which points are indexed and searches start.
    #[serde(default = "IndexConfig::default_max_resolution")]
    pub max_resolution: usize,

    /// Result cap applied when a query passes `None` for `max_results`.
    #[serde(default = "IndexConfig::default_max_results")]
    pub default_max_results: usize,

    /// Reject out-of-range coordinates on insert. When false they are clamped.
    #[serde(default = "IndexConfig::default_strict_coordinates")]
    pub strict_coordinates: bool,
}

impl IndexConfig {
    const fn default_max_resolution() -> usize {
        12
    }

    const fn default_max_results() -> usize {
        1_000_000
    }

    const fn default_strict_coordinates() -> bool {
        true
    }

    pub fn with_max_resolution(mut self, resolution: usize) -> Self {
        self.max_resolution = resolution;
        self
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    pub fn with_strict_coordinates(mut self, strict: bool) -> Self {
        self.strict_coordinates = strict;
        self
    }

    /// Settings that are valid but probably unintended.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.max_resolution > FINE_RESOLUTION_WARNING {
            warnings.push(format!(
                "Resolution {} produces cells far below GPS accuracy; \
                each point stores {} prefixes",
                self.max_resolution,
                self.max_resolution + 1
            ));
        }
        warnings
    }

    /// Check the configuration, logging any [`warnings`](Self::warnings).
    pub fn validate(&self) -> std::result::Result<(), String> {
        for warning in self.warnings() {
            log::warn!("{}", warning);
        }

        if self.max_resolution > MAX_RESOLUTION {
            return Err(format!(
                "max_resolution must be at most {}, got {}",
                MAX_RESOLUTION, self.max_resolution
            ));
        }

        if self.default_max_results == 0 {
            return Err("default_max_results must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: IndexConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: IndexConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file. `.toml` files need the `toml` feature;
    /// anything else is parsed as JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| GeocellError::Config(e.to_string()))
            }
            #[cfg(not(feature = "toml"))]
            Some("toml") => Err(GeocellError::Config(format!(
                "{} is a TOML file but the `toml` feature is disabled",
                path.display()
            ))),
            _ => Ok(Self::from_json(&contents)?),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_resolution: Self::default_max_resolution(),
            default_max_results: Self::default_max_results(),
            strict_coordinates: Self::default_strict_coordinates(),
        }
    }
}
