//! Search and encoding settings.
//!
//! The two default radii are separate settings on purpose: general site
//! search falls back to `default_radius_m`, the nearby-sites endpoint always
//! searches `nearby_radius_m`.

use crate::error::{Result as TourGeoResult, TourGeoError};
use serde::de::Error;
use std::path::Path;

/// Most decimals a route length can be rounded to.
pub const MAX_LENGTH_PRECISION: u32 = 15;

/// Query layer configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Radius used by general site search when the request has none
    #[serde(default = "SearchConfig::default_radius_m")]
    pub default_radius_m: f64,

    /// Fixed radius of the nearby-sites endpoint
    #[serde(default = "SearchConfig::default_nearby_radius_m")]
    pub nearby_radius_m: f64,

    /// Upper bound accepted for any requested radius
    #[serde(default = "SearchConfig::default_max_radius_m")]
    pub max_radius_m: f64,

    /// Join distance for category pair analysis
    #[serde(default = "SearchConfig::default_pair_radius_m")]
    pub pair_radius_m: f64,

    /// Decimal places kept in route lengths
    #[serde(default = "SearchConfig::default_length_precision")]
    pub length_precision: u32,
}

impl SearchConfig {
    const fn default_radius_m() -> f64 {
        1_000.0
    }

    const fn default_nearby_radius_m() -> f64 {
        5_000.0
    }

    const fn default_max_radius_m() -> f64 {
        50_000.0
    }

    const fn default_pair_radius_m() -> f64 {
        100.0
    }

    const fn default_length_precision() -> u32 {
        2
    }

    pub fn with_default_radius(mut self, meters: f64) -> Self {
        assert!(meters > 0.0, "Default radius must be greater than zero");
        self.default_radius_m = meters;
        self
    }

    pub fn with_nearby_radius(mut self, meters: f64) -> Self {
        assert!(meters > 0.0, "Nearby radius must be greater than zero");
        self.nearby_radius_m = meters;
        self
    }

    pub fn with_max_radius(mut self, meters: f64) -> Self {
        assert!(meters > 0.0, "Maximum radius must be greater than zero");
        self.max_radius_m = meters;
        self
    }

    pub fn with_pair_radius(mut self, meters: f64) -> Self {
        assert!(meters > 0.0, "Pair radius must be greater than zero");
        self.pair_radius_m = meters;
        self
    }

    pub fn with_length_precision(mut self, digits: u32) -> Self {
        assert!(
            digits <= MAX_LENGTH_PRECISION,
            "Route length precision must be at most {} digits",
            MAX_LENGTH_PRECISION
        );
        if digits > 6 {
            log::warn!(
                "Route length precision of {} digits is below the accuracy of the stored geometry",
                digits
            );
        }
        self.length_precision = digits;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        let radii = [
            ("default_radius_m", self.default_radius_m),
            ("nearby_radius_m", self.nearby_radius_m),
            ("max_radius_m", self.max_radius_m),
            ("pair_radius_m", self.pair_radius_m),
        ];
        for (name, value) in radii {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }

        if self.default_radius_m > self.max_radius_m {
            return Err(format!(
                "default_radius_m ({}) exceeds max_radius_m ({})",
                self.default_radius_m, self.max_radius_m
            ));
        }

        if self.nearby_radius_m > self.max_radius_m {
            return Err(format!(
                "nearby_radius_m ({}) exceeds max_radius_m ({})",
                self.nearby_radius_m, self.max_radius_m
            ));
        }

        if self.length_precision > MAX_LENGTH_PRECISION {
            return Err(format!(
                "length_precision ({}) exceeds {} digits",
                self.length_precision, MAX_LENGTH_PRECISION
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: SearchConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: SearchConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file, picking the format from its extension.
    ///
    /// `.json` is always supported; `.toml` requires the `toml` feature.
    pub fn load(path: impl AsRef<Path>) -> TourGeoResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TourGeoError::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                Self::from_json(&contents).map_err(|e| TourGeoError::Config(e.to_string()))
            }
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| TourGeoError::Config(e.to_string()))
            }
            other => Err(TourGeoError::Config(format!(
                "unsupported configuration format: {:?}",
                other
            ))),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_m: Self::default_radius_m(),
            nearby_radius_m: Self::default_nearby_radius_m(),
            max_radius_m: Self::default_max_radius_m(),
            pair_radius_m: Self::default_pair_radius_m(),
            length_precision: Self::default_length_precision(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = SearchConfig::default();
        assert_eq!(config.default_radius_m, 1_000.0);
        assert_eq!(config.nearby_radius_m, 5_000.0);
        assert_eq!(config.max_radius_m, 50_000.0);
        assert_eq!(config.pair_radius_m, 100.0);
        assert_eq!(config.length_precision, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = SearchConfig::default()
            .with_default_radius(750.0)
            .with_pair_radius(250.0)
            .with_length_precision(3);

        let json = config.to_json().unwrap();
        let deserialized = SearchConfig::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SearchConfig::from_json(r#"{"nearby_radius_m": 2500.0}"#).unwrap();
        assert_eq!(config.nearby_radius_m, 2_500.0);
        assert_eq!(config.default_radius_m, 1_000.0);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(SearchConfig::from_json(r#"{"radius": 10.0}"#).is_err());
    }

    #[test]
    fn test_validation_rejects_default_above_max() {
        let json = r#"{"default_radius_m": 60000.0}"#;
        assert!(SearchConfig::from_json(json).is_err());

        let config = SearchConfig {
            pair_radius_m: 0.0,
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_length_precision() {
        let json = r#"{"length_precision": 400}"#;
        assert!(SearchConfig::from_json(json).is_err());

        let at_bound = SearchConfig {
            length_precision: MAX_LENGTH_PRECISION,
            ..SearchConfig::default()
        };
        assert!(at_bound.validate().is_ok());

        let above = SearchConfig {
            length_precision: MAX_LENGTH_PRECISION + 1,
            ..SearchConfig::default()
        };
        assert!(above.validate().is_err());
    }

    #[test]
    #[should_panic(expected = "at most")]
    fn test_builder_rejects_excessive_precision() {
        let _ = SearchConfig::default().with_length_precision(MAX_LENGTH_PRECISION + 1);
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"max_radius_m": 20000.0}}"#).unwrap();

        let config = SearchConfig::load(file.path()).unwrap();
        assert_eq!(config.max_radius_m, 20_000.0);
    }

    #[test]
    fn test_load_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = SearchConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, TourGeoError::Config(_)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_roundtrip() {
        let config = SearchConfig::default().with_nearby_radius(3_000.0);
        let text = config.to_toml().unwrap();
        assert_eq!(SearchConfig::from_toml(&text).unwrap(), config);
    }
}
