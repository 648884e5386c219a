//! Application-wide constants and configuration values
//!
//! This module centralizes the magic numbers shared by the HTTP client,
//! the cache store and the configuration layer.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Header carrying the API-Sports application key
pub const API_KEY_HEADER: &str = "x-apisports-key";

/// Cache TTL (Time To Live) values in milliseconds
pub mod cache_ttl {
    /// TTL a fresh store starts with (5 minutes)
    pub const DEFAULT_MS: u64 = 5 * 60 * 1000;

    /// Upper bound accepted from configuration (7 days)
    pub const MAX_MS: u64 = 7 * 24 * 60 * 60 * 1000;
}

/// Persisted blob layout
pub mod persistence {
    /// Field holding the shared TTL inside the persisted `state` object
    pub const TTL_FIELD: &str = "cacheTTL";

    /// Version written next to `state`; blobs with another version are ignored
    pub const FORMAT_VERSION: u32 = 0;
}

/// Environment variables that override the config file
pub mod env {
    pub const API_KEY: &str = "SPORTS_API_KEY";
    pub const CACHE_TTL_MS: &str = "SPORTS_API_CACHE_TTL_MS";
    pub const CACHE_DIR: &str = "SPORTS_API_CACHE_DIR";
    pub const LOG_FILE: &str = "SPORTS_API_LOG_FILE";
    pub const HTTP_TIMEOUT: &str = "SPORTS_API_HTTP_TIMEOUT";
    pub const BASE_URL: &str = "SPORTS_API_BASE_URL";
}

/// Name used for the config directory, the log file and the log filter directive
pub const APP_NAME: &str = "sports_api_cache";
