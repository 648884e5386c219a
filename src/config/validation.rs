use crate::constants::cache_ttl;
use crate::error::AppError;
use std::path::Path;

use super::Config;

/// Validates the configuration settings
///
/// # Validation Rules
/// - HTTP timeout must be at least one second
/// - Cache TTL cannot exceed `cache_ttl::MAX_MS`
/// - A base URL override must be an http(s) URL
/// - If log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
/// - If cache directory is provided, it cannot be empty
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.http_timeout_seconds == 0 {
        return Err(AppError::config_error(
            "HTTP timeout must be at least 1 second",
        ));
    }

    if config.cache_ttl_ms > cache_ttl::MAX_MS {
        return Err(AppError::config_error(format!(
            "Cache TTL {}ms exceeds the maximum of {}ms",
            config.cache_ttl_ms,
            cache_ttl::MAX_MS
        )));
    }

    if let Some(base_url) = &config.base_url_override
        && !base_url.starts_with("http://")
        && !base_url.starts_with("https://")
    {
        return Err(AppError::config_error(
            "Base URL override must start with http:// or https://",
        ));
    }

    if let Some(cache_dir) = &config.cache_dir
        && cache_dir.trim().is_empty()
    {
        return Err(AppError::config_error("Cache directory cannot be empty"));
    }

    // Validate log file path if provided
    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
