//! CLI configuration management
//!
//! Handles loading and saving CLI-specific configuration, including the
//! API credentials.

use anyhow::{Context, Result};
use metalview_core::paths::default_config_path;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// API endpoint URL
    pub endpoint: String,

    /// API username
    #[serde(default)]
    pub username: String,

    /// API key paired with the username
    #[serde(default)]
    pub api_key: String,

    /// Default output format
    pub output_format: String,

    /// Enable verbose logging by default
    pub verbose: bool,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.metal.cloud".to_string(),
            username: String::new(),
            api_key: String::new(),
            output_format: "table".to_string(),
            verbose: false,
            timeout: 30,
        }
    }
}

impl CliConfig {
    /// Load configuration from an explicit file, or from the default path.
    ///
    /// With an explicit path the file must exist. With the default path, a
    /// default configuration (empty credentials) is created and saved when
    /// no file is present, so credentials can still come from flags or the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            return toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()));
        }

        let config_path = default_config_path();
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).context("Failed to read CLI config file")?;

            toml::from_str(&content).context("Failed to parse CLI config file")
        } else {
            // Create default config and save it
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        let config_path = default_config_path();

        // Create parent directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize CLI config")?;

        std::fs::write(&config_path, content).context("Failed to write CLI config file")?;

        Ok(())
    }

    /// The credentials required to contact the API.
    ///
    /// # Errors
    ///
    /// Returns an instructive error when the username or API key is
    /// missing.
    pub fn credentials(&self) -> Result<(String, String)> {
        if self.username.trim().is_empty() || self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "You must specify a username and API key: use --username/--api-key, \
                 METALVIEW_USERNAME/METALVIEW_API_KEY, or the config file"
            ));
        }
        Ok((self.username.clone(), self.api_key.clone()))
    }

    /// A copy safe for display: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.api_key.is_empty() {
            config.api_key = "********".to_string();
        }
        config
    }

    /// Create a new builder for constructing configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for CLI configuration with validation and priority chain support
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Config file
/// 3. Environment variables
/// 4. CLI arguments
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    endpoint: Option<String>,
    username: Option<String>,
    api_key: Option<String>,
    output_format: Option<String>,
    verbose: Option<bool>,
    timeout: Option<u64>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set endpoint URL (with validation)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        Self::validate_endpoint(&endpoint)?;
        self.endpoint = Some(endpoint);
        Ok(self)
    }

    /// Set API username
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set output format (with validation)
    pub fn with_output_format(mut self, format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        Self::validate_output_format(&format)?;
        self.output_format = Some(format);
        Ok(self)
    }

    /// Set verbose flag
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Load configuration from file
    pub fn with_config_file(self, load_file: bool, path: Option<&Path>) -> Result<Self> {
        if !load_file {
            return Ok(self);
        }

        // An explicitly requested file must load; the default file is
        // best-effort.
        let config = match (CliConfig::load(path), path) {
            (Ok(config), _) => config,
            (Err(e), Some(_)) => return Err(e),
            (Err(_), None) => return Ok(self),
        };

        // Only use file values if they weren't already set (preserving priority)
        Ok(Self {
            endpoint: self.endpoint.or(Some(config.endpoint)),
            username: self.username.or(Some(config.username)),
            api_key: self.api_key.or(Some(config.api_key)),
            output_format: self.output_format.or(Some(config.output_format)),
            verbose: self.verbose.or(Some(config.verbose)),
            timeout: self.timeout.or(Some(config.timeout)),
        })
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        // Only apply env vars if values weren't already set (preserving priority)
        if self.endpoint.is_none() {
            if let Ok(endpoint) = std::env::var("METALVIEW_ENDPOINT") {
                // Validate before applying
                if Self::validate_endpoint(&endpoint).is_ok() {
                    self.endpoint = Some(endpoint);
                }
            }
        }

        if self.username.is_none() {
            if let Ok(username) = std::env::var("METALVIEW_USERNAME") {
                self.username = Some(username);
            }
        }

        if self.api_key.is_none() {
            if let Ok(api_key) = std::env::var("METALVIEW_API_KEY") {
                self.api_key = Some(api_key);
            }
        }

        if self.output_format.is_none() {
            if let Ok(format) = std::env::var("METALVIEW_FORMAT") {
                // Validate before applying
                if Self::validate_output_format(&format).is_ok() {
                    self.output_format = Some(format);
                }
            }
        }

        if self.verbose.is_none() {
            if let Ok(verbose) = std::env::var("METALVIEW_VERBOSE") {
                self.verbose = Some(verbose.to_lowercase() == "true" || verbose == "1");
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var("METALVIEW_TIMEOUT") {
                if let Ok(timeout) = timeout.parse() {
                    // Validate before applying
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        self
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<CliConfig> {
        let defaults = CliConfig::default();

        let endpoint = self.endpoint.unwrap_or(defaults.endpoint);
        let output_format = self.output_format.unwrap_or(defaults.output_format);
        let timeout = self.timeout.unwrap_or(defaults.timeout);

        // Validate final values
        Self::validate_endpoint(&endpoint)?;
        Self::validate_output_format(&output_format)?;
        Self::validate_timeout(timeout)?;

        Ok(CliConfig {
            endpoint,
            username: self.username.unwrap_or(defaults.username),
            api_key: self.api_key.unwrap_or(defaults.api_key),
            output_format,
            verbose: self.verbose.unwrap_or(defaults.verbose),
            timeout,
        })
    }

    /// Validate endpoint URL format
    fn validate_endpoint(endpoint: &str) -> Result<()> {
        if endpoint.is_empty() {
            return Err(anyhow::anyhow!("Endpoint URL cannot be empty"));
        }

        // Basic URL validation - must start with http:// or https://
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "Endpoint URL must start with http:// or https://"
            ));
        }

        Ok(())
    }

    /// Validate output format
    fn validate_output_format(format: &str) -> Result<()> {
        match format {
            "table" | "json" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid output format '{}'. Must be 'table' or 'json'",
                format
            )),
        }
    }

    /// Validate timeout value
    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be greater than 0"));
        }

        if timeout > 300 {
            return Err(anyhow::anyhow!(
                "Timeout must be less than or equal to 300 seconds"
            ));
        }

        Ok(())
    }
}
