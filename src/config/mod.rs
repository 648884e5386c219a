use crate::constants::{cache_ttl, env};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod user_prompts;
pub mod validation;

use paths::{get_cache_dir_path, get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// API-Sports application key, sent as the `x-apisports-key` header.
    #[serde(default)]
    pub api_key: String,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// TTL every sport store starts with, in milliseconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_ms: u64,
    /// Directory persisted cache snapshots are written to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Replaces every sport's base URL, e.g. to point at a proxy or a mock server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_override: Option<String>,
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_cache_ttl() -> u64 {
    cache_ttl::DEFAULT_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: String::new(),
            http_timeout_seconds: default_http_timeout(),
            cache_ttl_ms: default_cache_ttl(),
            cache_dir: None,
            log_file_path: None,
            base_url_override: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, defaults are used.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `SPORTS_API_KEY` - Override API key
    /// - `SPORTS_API_CACHE_TTL_MS` - Override cache TTL in milliseconds
    /// - `SPORTS_API_CACHE_DIR` - Override cache directory
    /// - `SPORTS_API_LOG_FILE` - Override log file path
    /// - `SPORTS_API_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `SPORTS_API_BASE_URL` - Override the upstream base URL
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - Error occurred during load or validation
    ///
    /// # Notes
    /// - A missing API key is not an error here; see [`Config::require_api_key`]
    /// - Environment variables take precedence over config file
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies the `SPORTS_API_*` environment variables on top of the current values.
    /// Numeric variables that do not parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(env::API_KEY) {
            self.api_key = api_key;
        }

        if let Some(ttl) = std::env::var(env::CACHE_TTL_MS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.cache_ttl_ms = ttl;
        }

        if let Ok(cache_dir) = std::env::var(env::CACHE_DIR) {
            self.cache_dir = Some(cache_dir);
        }

        if let Ok(log_file_path) = std::env::var(env::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(base_url) = std::env::var(env::BASE_URL) {
            self.base_url_override = Some(base_url);
        }
    }

    /// Validates the configuration settings
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(AppError)` - Configuration validation failed
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Returns the API key, or a configuration error naming where to set it.
    pub fn require_api_key(&self) -> Result<String, AppError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(AppError::config_error(format!(
                "No API key configured. Set {} or run with --set-api-key",
                env::API_KEY
            )));
        }
        Ok(key.to_string())
    }

    /// Directory the file storage backend writes to.
    pub fn cache_dir_path(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => PathBuf::from(dir),
            None => PathBuf::from(get_cache_dir_path()),
        }
    }

    /// Saves current configuration to the default config file location.
    ///
    /// # Notes
    /// - Creates config directory if it doesn't exist
    /// - Uses TOML format for storage
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and the effective settings, environment
    ///   overrides included
    /// - The API key is masked
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path}");
            println!("(Not created yet, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Key:");
        println!("{}", mask_api_key(&config.api_key));
        println!("────────────────────────────────────");
        println!("Cache TTL:");
        println!("{} ms", config.cache_ttl_ms);
        println!("────────────────────────────────────");
        println!("Cache Directory:");
        println!("{}", config.cache_dir_path().display());
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        if let Some(base_url) = &config.base_url_override {
            println!("────────────────────────────────────");
            println!("Base URL Override:");
            println!("{base_url}");
        }
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}.log", crate::constants::APP_NAME);
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without applying environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn mask_api_key(key: &str) -> String {
    let key = key.trim();
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{visible}")
}
