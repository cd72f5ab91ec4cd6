//! Configuration module for rendezvous.
//!
//! Configuration is read once at startup from an optional YAML file,
//! overridden by environment variables, validated, and then passed by
//! reference into the client. Nothing mutates it afterwards.

mod api;
mod logging;
mod mock;
mod timeout;

pub use api::{
    ApiConfig, CredentialsPolicy, DbStatusMode, Endpoint, EndpointsConfig,
    DEFAULT_CREDENTIAL_HEADER, ID_PLACEHOLDER,
};
pub use logging::{LogFormat, LogLevel, LogOutput, LoggingConfig};
pub use mock::MockConfig;
pub use timeout::TimeoutConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Environment variable for configuration file path.
pub const ENV_CONFIG_PATH: &str = "RENDEZVOUS_CONFIG";

/// Environment variable for the backend base URL.
pub const ENV_API_URL: &str = "RENDEZVOUS_API_URL";

/// Environment variable for the secondary credential.
pub const ENV_MONGODB_URI: &str = "RENDEZVOUS_MONGODB_URI";

/// Files searched in the working directory when no path is given.
const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "rendezvous.yaml",
    "rendezvous.yml",
    "config.yaml",
    "config.yml",
];

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API configuration.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeout: TimeoutConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Mock backend configuration.
    pub mock: MockConfig,
}

impl Config {
    /// Loads configuration from an optional path.
    ///
    /// Priority: explicit path, then `RENDEZVOUS_CONFIG`, then the default
    /// file names in the working directory, then built-in defaults.
    /// Environment overrides are applied in every case.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self, Error> {
        let mut config = match Self::resolve_config_path(path.as_ref().map(|p| p.as_ref()))? {
            Some(path) => Self::parse_file(&path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file, without environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config = Self::parse_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML string, without environment overrides.
    pub fn load_from_str(content: &str) -> Result<Self, Error> {
        let config = Self::parse_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_with_source(
                format!("Failed to read config file '{}'", path.display()),
                e,
            )
        })?;

        Self::parse_str(&content)
    }

    fn parse_str(content: &str) -> Result<Self, Error> {
        // An empty file deserializes to a YAML null.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content)
            .map_err(|e| Error::config_with_source(format!("Failed to parse config: {}", e), e))
    }

    fn resolve_config_path(explicit_path: Option<&Path>) -> Result<Option<PathBuf>, Error> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(Error::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path.to_path_buf()));
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_PATH) {
            let path = PathBuf::from(env_path);
            if !path.exists() {
                return Err(Error::config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok(Some(path));
        }

        Ok(DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists()))
    }

    /// Applies environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // API settings
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = Some(url);
        }
        if let Some(credential) = lookup(ENV_MONGODB_URI) {
            self.api.credential = Some(credential);
        }
        if let Some(mode) = lookup("RENDEZVOUS_DB_STATUS") {
            if let Ok(mode) = mode.parse() {
                self.api.db_status = mode;
            }
        }

        // Timeout settings
        if let Some(seconds) = lookup("RENDEZVOUS_HTTP_TIMEOUT") {
            if let Ok(seconds) = seconds.parse() {
                self.timeout.http_seconds = seconds;
            }
        }

        // Logging settings
        if let Some(level) = lookup("RENDEZVOUS_LOG_LEVEL") {
            if let Ok(level) = level.parse() {
                self.logging.level = level;
            }
        }
        if let Some(format) = lookup("RENDEZVOUS_LOG_FORMAT") {
            if let Ok(format) = format.parse() {
                self.logging.format = format;
            }
        }
    }

    /// Validates configuration.
    pub fn validate(&self) -> Result<(), Error> {
        self.api.validate()?;

        if self.timeout.http_seconds == 0 {
            return Err(Error::config("timeout.http_seconds must be > 0"));
        }

        if self.logging.output == LogOutput::File && self.logging.file_path.is_none() {
            return Err(Error::config(
                "logging.file_path is required when output is file",
            ));
        }

        if self.mock.port == 0 {
            return Err(Error::config("mock.port must be > 0"));
        }

        Ok(())
    }

    /// Returns a copy safe to print, with the credential masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.api.credential.is_some() {
            config.api.credential = Some("********".to_string());
        }
        config
    }
}
