// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of AgileLens.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use agilelens_cache::CacheConfig;
use agilelens_types::TariffComparison;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::error::ServiceError;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "AGILELENS_CONFIG";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Octopus Energy account and tariff
    #[serde(default)]
    pub octopus: OctopusConfig,

    /// Two-tier cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Rates the Agile tariff is compared against
    #[serde(default)]
    pub tariff: TariffComparison,

    #[serde(default)]
    pub system: SystemConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OctopusConfig {
    /// API key, only needed for consumption data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Meter Point Administration Number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mpan: Option<String>,

    /// Meter serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    /// DNO region letter (H = Southern England)
    #[serde(default = "default_region")]
    pub region: String,

    /// Agile product code
    #[serde(default = "default_product_code")]
    pub product_code: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_region() -> String {
    "H".to_owned()
}

fn default_product_code() -> String {
    "AGILE-24-10-01".to_owned()
}

fn default_base_url() -> String {
    "https://api.octopus.energy/v1".to_owned()
}

impl Default for OctopusConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            mpan: None,
            serial_number: None,
            region: default_region(),
            product_code: default_product_code(),
            base_url: default_base_url(),
        }
    }
}

/// Credentials for the authenticated consumption endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct MeterCredentials {
    pub api_key: String,
    pub mpan: String,
    pub serial_number: String,
}

impl std::fmt::Debug for MeterCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeterCredentials")
            .field("api_key", &"<redacted>")
            .field("mpan", &self.mpan)
            .field("serial_number", &self.serial_number)
            .finish()
    }
}

impl OctopusConfig {
    /// Full tariff code, e.g. `E-1R-AGILE-24-10-01-H`
    #[must_use]
    pub fn tariff_code(&self) -> String {
        format!("E-1R-{}-{}", self.product_code, self.region)
    }

    /// Everything the consumption endpoint needs, or which parts are missing
    pub fn consumption_credentials(&self) -> Result<MeterCredentials, ServiceError> {
        fn present(value: Option<&String>) -> Option<String> {
            value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_owned)
        }

        match (
            present(self.api_key.as_ref()),
            present(self.mpan.as_ref()),
            present(self.serial_number.as_ref()),
        ) {
            (None, _, _) => Err(ServiceError::Configuration(
                "OCTOPUS_API_KEY not configured".to_owned(),
            )),
            (Some(_), None, _) | (Some(_), _, None) => Err(ServiceError::Configuration(
                "MPAN and SERIAL_NUMBER must be configured for consumption data".to_owned(),
            )),
            (Some(api_key), Some(mpan), Some(serial_number)) => Ok(MeterCredentials {
                api_key,
                mpan,
                serial_number,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a config file or the environment
    ///
    /// Order: the file named by `AGILELENS_CONFIG`, `config.toml`,
    /// `config.json`, then defaults. Environment variables override whichever
    /// source was used.
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            Self::from_file(Path::new(&path))?
        } else if Path::new("config.toml").exists() {
            Self::from_file(Path::new("config.toml"))?
        } else if Path::new("config.json").exists() {
            Self::from_file(Path::new("config.json"))?
        } else {
            warn!("No configuration file found, using defaults with environment overrides");
            Self::default()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML or JSON config file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?,
        };

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override fields from environment-style variables
    ///
    /// `lookup` is `std::env::var` in production and a map in tests.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("OCTOPUS_API_KEY") {
            self.octopus.api_key = Some(key);
        }
        if let Some(mpan) = lookup("MPAN") {
            self.octopus.mpan = Some(mpan);
        }
        if let Some(serial) = lookup("SERIAL_NUMBER") {
            self.octopus.serial_number = Some(serial);
        }
        if let Some(region) = lookup("REGION") {
            self.octopus.region = region;
        }
        if let Some(product) = lookup("PRODUCT_CODE") {
            self.octopus.product_code = product;
        }
        if let Some(url) = lookup("OCTOPUS_API_BASE_URL") {
            self.octopus.base_url = url;
        }

        if let Some(url) = lookup("REDIS_URL") {
            self.cache.remote_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(enabled) = lookup("CACHE_ENABLED")
            && let Ok(enabled) = enabled.parse::<bool>()
        {
            self.cache.enabled = enabled;
        }
        if let Some(ttl) = lookup("CACHE_TTL_SECONDS")
            && let Ok(secs) = ttl.parse::<u64>()
        {
            self.cache.default_ttl_secs = secs;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.system.log_level = level.to_lowercase();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let region = &self.octopus.region;
        if region.len() != 1 || !region.chars().all(|c| c.is_ascii_uppercase()) {
            anyhow::bail!("region must be a single upper-case letter, got '{region}'");
        }

        if self.octopus.product_code.trim().is_empty() {
            anyhow::bail!("product_code cannot be empty");
        }

        if !self.octopus.base_url.starts_with("http://")
            && !self.octopus.base_url.starts_with("https://")
        {
            anyhow::bail!("base_url must be an http(s) URL");
        }

        if self.cache.default_ttl_secs == 0 {
            anyhow::bail!("cache default_ttl_secs must be at least 1 second");
        }

        let rates = [
            ("flat_rate_pence", self.tariff.flat_rate_pence),
            (
                "fixed_standing_charge_pence",
                self.tariff.fixed_standing_charge_pence,
            ),
            (
                "agile_standing_charge_pence",
                self.tariff.agile_standing_charge_pence,
            ),
        ];
        for (name, value) in rates {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{name} must be a non-negative number");
            }
        }

        if !LOG_LEVELS.contains(&self.system.log_level.as_str()) {
            anyhow::bail!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.system.log_level
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.default_ttl_secs, 3600);
        assert!(config.cache.remote_url.is_none());
        assert_eq!(config.octopus.region, "H");
        assert_eq!(config.octopus.tariff_code(), "E-1R-AGILE-24-10-01-H");
        assert!((config.tariff.flat_rate_pence - 24.50).abs() < f64::EPSILON);
        assert_eq!(config.system.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_toml_with_partial_sections() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[octopus]
region = "C"
mpan = "1200012345678"

[cache]
default_ttl_secs = 600
remote_url = "redis://localhost:6379/0"

[tariff]
flat_rate_pence = 27.03
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.octopus.region, "C");
        assert_eq!(config.octopus.product_code, "AGILE-24-10-01");
        assert_eq!(config.octopus.mpan.as_deref(), Some("1200012345678"));
        assert_eq!(config.cache.default_ttl_secs, 600);
        assert!(config.cache.enabled);
        assert!((config.tariff.flat_rate_pence - 27.03).abs() < f64::EPSILON);
        assert!((config.tariff.agile_standing_charge_pence - 48.79).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"{{"cache": {{"enabled": false}}, "system": {{"log_level": "debug"}}}}"#)
            .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.system.log_level, "debug");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[octopus\nregion = ").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OCTOPUS_API_KEY", "sk_live_abc"),
            ("MPAN", "1200012345678"),
            ("SERIAL_NUMBER", "21L1234567"),
            ("REGION", "A"),
            ("REDIS_URL", "redis://cache:6379"),
            ("CACHE_ENABLED", "false"),
            ("CACHE_TTL_SECONDS", "120"),
            ("LOG_LEVEL", "DEBUG"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| env.get(name).map(|v| (*v).to_owned()));

        assert_eq!(config.octopus.region, "A");
        assert_eq!(config.cache.remote_url.as_deref(), Some("redis://cache:6379"));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.default_ttl_secs, 120);
        assert_eq!(config.system.log_level, "debug");
        assert!(config.validate().is_ok());

        let credentials = config.octopus.consumption_credentials().unwrap();
        assert_eq!(credentials.serial_number, "21L1234567");
        assert!(!format!("{credentials:?}").contains("sk_live_abc"));
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|name| match name {
            "CACHE_ENABLED" => Some("maybe".to_owned()),
            "CACHE_TTL_SECONDS" => Some("-5".to_owned()),
            _ => None,
        });
        assert!(config.cache.enabled);
        assert_eq!(config.cache.default_ttl_secs, 3600);
    }

    #[test]
    fn test_missing_credentials() {
        let mut octopus = OctopusConfig::default();
        let err = octopus.consumption_credentials().unwrap_err();
        assert!(err.to_string().contains("OCTOPUS_API_KEY"));

        octopus.api_key = Some("key".to_owned());
        octopus.mpan = Some("  ".to_owned());
        let err = octopus.consumption_credentials().unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(msg) if msg.contains("MPAN")));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.octopus.region = "HH".to_owned();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.cache.default_ttl_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.tariff.flat_rate_pence = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.system.log_level = "loud".to_owned();
        assert!(config.validate().is_err());
    }
}
