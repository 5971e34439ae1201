//! Clinic configuration loading from config.toml
//!
//! This module loads the optional `config.toml` file that tunes the presentation
//! cache and lists the professionals and insurances to seed on startup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const fn default_cache_ttl_secs() -> u64 {
    300
}

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct ClinicConfig {
    /// How long cached listings stay fresh in the bot layer
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Professionals that must exist after startup
    #[serde(default)]
    pub professionals: Vec<ProfessionalConfig>,
    /// Insurance names that must exist after startup
    #[serde(default)]
    pub insurances: Vec<String>,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            professionals: Vec::new(),
            insurances: Vec::new(),
        }
    }
}

impl ClinicConfig {
    /// Cache time-to-live as a [`Duration`]
    #[must_use]
    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// A professional to seed
#[derive(Debug, Deserialize, Clone)]
pub struct ProfessionalConfig {
    /// Display name
    pub name: String,
    /// Medical specialty
    pub specialty: String,
}

/// Loads clinic configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ClinicConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads clinic configuration from `./config.toml`, falling back to defaults when
/// the file does not exist.
pub fn load_default_config() -> Result<ClinicConfig> {
    let path = Path::new("config.toml");
    if !path.exists() {
        tracing::info!("No config.toml found, using default clinic configuration");
        return Ok(ClinicConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_clinic_config() {
        let toml_str = r#"
            cache_ttl_secs = 60
            insurances = ["Unimed", "Bradesco Saúde"]

            [[professionals]]
            name = "Dra. Ana Souza"
            specialty = "Cardiology"

            [[professionals]]
            name = "Dr. Bruno Lima"
            specialty = "Dermatology"
        "#;

        let config: ClinicConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.insurances, vec!["Unimed", "Bradesco Saúde"]);
        assert_eq!(config.professionals.len(), 2);
        assert_eq!(config.professionals[0].name, "Dra. Ana Souza");
        assert_eq!(config.professionals[1].specialty, "Dermatology");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ClinicConfig = toml::from_str("").unwrap();
        assert_eq!(config.cache_ttl_secs, 300);
        assert!(config.professionals.is_empty());
        assert!(config.insurances.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("definitely/not/here/config.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
