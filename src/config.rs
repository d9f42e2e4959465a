//! Configuration management for kyccheck
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.kyccheck/config.toml

use crate::errors::{KycError, Result};
use crate::extraction::client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::extraction::image::DEFAULT_MAX_IMAGE_BYTES;
use crate::validation::ValidationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for kyccheck
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub validation: ValidationConfig,
}

/// Vision model API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub max_image_bytes: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: "FIREWORKS_API_KEY".to_string(),
            timeout_secs: 120,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| KycError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| KycError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".kyccheck").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.validation.validate()?;

        if self.extraction.timeout_secs == 0 {
            return Err(KycError::ConfigError(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.extraction.max_image_bytes == 0 {
            return Err(KycError::ConfigError(
                "max_image_bytes must be greater than 0".to_string(),
            ));
        }

        if self.extraction.api_key_env.trim().is_empty() {
            return Err(KycError::ConfigError("api_key_env must not be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KycError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| KycError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| KycError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}
