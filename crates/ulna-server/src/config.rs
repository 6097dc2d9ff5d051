//! Configuration file parsing for the server.
//!
//! Settings load from an optional TOML file, with environment variables
//! taking precedence so deployments can run file-less. The variable names
//! (`OPENAI_API_KEY`, `CORS_ORIGINS`, `MANUFACTURING_SITE_URL`,
//! `BOT_VERIFY_KEY`) match the original deployment; server-specific knobs
//! carry the `ULNA_` prefix.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field failed validation
    #[error("Invalid configuration field: {0}")]
    InvalidField(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Directory for the append-only JSONL logs
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Allowed CORS origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// OpenAI API key; absent means rule-based derivation only
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Model name for the advisory prompt
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Maximum time for a single model call (seconds)
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    /// Maximum accepted problem description length (characters)
    #[serde(default = "default_max_problem_length")]
    pub max_problem_length: usize,

    /// URL for the "locate 3D-printing service" page
    #[serde(default = "default_manufacturing_url")]
    pub manufacturing_site_url: String,

    /// Key that identifies trusted bot callers (advisory only)
    #[serde(default)]
    pub bot_verify_key: Option<String>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_model_timeout() -> u64 {
    30
}

fn default_max_problem_length() -> usize {
    4_000
}

fn default_manufacturing_url() -> String {
    "https://www.google.com/maps/search/3d+printing+service+near+me".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            data_dir: default_data_dir(),
            cors_origins: default_cors_origins(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            model_timeout_secs: default_model_timeout(),
            max_problem_length: default_max_problem_length(),
            manufacturing_site_url: default_manufacturing_url(),
            bot_verify_key: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: ServerConfig = toml::from_str(&contents)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = ServerConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ULNA_BIND_ADDRESS") {
            self.bind_address = v;
        }
        if let Ok(v) = std::env::var("ULNA_BIND_PORT") {
            if let Ok(port) = v.parse() {
                self.bind_port = port;
            }
        }
        if let Ok(v) = std::env::var("ULNA_DATA_DIR") {
            self.data_dir = v;
        }
        if let Ok(v) = std::env::var("CORS_ORIGINS") {
            let origins: Vec<String> = v
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !origins.is_empty() {
                self.cors_origins = origins;
            }
        }
        if let Ok(v) = std::env::var("OPENAI_API_KEY") {
            if !v.trim().is_empty() {
                self.openai_api_key = Some(v);
            }
        }
        if let Ok(v) = std::env::var("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Ok(v) = std::env::var("MANUFACTURING_SITE_URL") {
            self.manufacturing_site_url = v;
        }
        if let Ok(v) = std::env::var("BOT_VERIFY_KEY") {
            if !v.trim().is_empty() {
                self.bot_verify_key = Some(v);
            }
        }
    }

    /// Validate field values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_problem_length == 0 {
            return Err(ConfigError::InvalidField(
                "max_problem_length must be greater than 0".to_string(),
            ));
        }
        if self.model_timeout_secs == 0 {
            return Err(ConfigError::InvalidField(
                "model_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
