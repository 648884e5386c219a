use std::path::Path;

use crate::constants::APP_NAME;

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_NAME)
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_NAME)
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Returns the directory persisted cache snapshots are written to by default.
///
/// Uses the platform cache directory (e.g., ~/.cache on Linux), falling back
/// to the current directory.
pub fn get_cache_dir_path() -> String {
    dirs::cache_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_NAME)
        .to_string_lossy()
        .to_string()
}
