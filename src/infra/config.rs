//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! The PORT environment variable, when set, overrides `server.port`.

use crate::domain::KNOWN_CITIES;
use crate::services::dates::InvalidDatePolicy;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound on request body size (bytes)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// CSV dataset with ReviewId, ReviewBody, Location, Timestamp columns
    #[serde(default = "default_reviews_file")]
    pub reviews_file: String,
}

fn default_reviews_file() -> String {
    "data/reviews.csv".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { reviews_file: default_reviews_file() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryConfig {
    #[serde(default)]
    pub invalid_date_policy: InvalidDatePolicy,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SentimentConfig {
    /// VADER-format lexicon replacing the built-in one
    #[serde(default)]
    pub lexicon_file: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SubmissionConfig {
    /// Overrides the built-in city allowlist when set
    #[serde(default)]
    pub cities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    bind_address: String,
    port: u16,
    max_body_bytes: usize,
    reviews_file: String,
    invalid_date_policy: InvalidDatePolicy,
    lexicon_file: Option<String>,
    cities: Vec<String>,
    log_json: bool,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        let cities = toml_config
            .submission
            .cities
            .unwrap_or_else(|| KNOWN_CITIES.iter().map(|c| c.to_string()).collect());

        Self {
            bind_address: toml_config.server.bind_address,
            port: toml_config.server.port,
            max_body_bytes: toml_config.server.max_body_bytes,
            reviews_file: toml_config.data.reviews_file,
            invalid_date_policy: toml_config.query.invalid_date_policy,
            lexicon_file: toml_config.sentiment.lexicon_file,
            cities,
            log_json: toml_config.logging.json,
            config_file,
        }
    }

    /// Determine config file path from args or environment
    pub fn resolve_config_path(args: &[String]) -> String {
        // Check for --config argument
        for (i, arg) in args.iter().enumerate() {
            if arg == "--config" {
                if let Some(path) = args.get(i + 1) {
                    return path.clone();
                }
            }
            if let Some(path) = arg.strip_prefix("--config=") {
                return path.to_string();
            }
        }

        // Check CONFIG_FILE environment variable
        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load from an explicit path, falling back to defaults, then apply PORT
    pub fn load_from_path(path: &str) -> Self {
        let config = match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {:#}. Using defaults.", e);
                Self::default()
            }
        };
        config.with_port_override(env::var("PORT").ok().as_deref())
    }

    /// Override the listen port from a PORT-style value (ignored if unparsable)
    pub fn with_port_override(mut self, value: Option<&str>) -> Self {
        if let Some(value) = value {
            match value.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => eprintln!("Warning: invalid PORT '{}': {}. Using {}.", value, e, self.port),
            }
        }
        self
    }

    // Getters for all config fields
    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    pub fn reviews_file(&self) -> &str {
        &self.reviews_file
    }

    pub fn invalid_date_policy(&self) -> InvalidDatePolicy {
        self.invalid_date_policy
    }

    pub fn lexicon_file(&self) -> Option<&str> {
        self.lexicon_file.as_deref()
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn log_json(&self) -> bool {
        self.log_json
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to point at a dataset
    pub fn with_reviews_file(mut self, path: &str) -> Self {
        self.reviews_file = path.to_string();
        self
    }

    /// Builder method for tests to choose the invalid-date policy
    pub fn with_invalid_date_policy(mut self, policy: InvalidDatePolicy) -> Self {
        self.invalid_date_policy = policy;
        self
    }
}
