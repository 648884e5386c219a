//! Typed API-Sports clients with a shared keyed TTL cache
//!
//! Every sport (football, basketball, hockey, rugby, handball, volleyball,
//! MMA, NFL, Formula 1) is a declaration in [`sports`] that plugs into the
//! same generic [`cache::CacheStore`]. Lookups derive a canonical key from
//! the endpoint and its parameters, serve live entries from memory and
//! persist the whole store as one JSON blob through a [`cache::StorageAdapter`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sports_api_cache::api::SportApi;
//! use sports_api_cache::cache::{FileStorage, Params};
//! use sports_api_cache::config::Config;
//! use sports_api_cache::error::AppError;
//! use sports_api_cache::sports::football;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::load().await?;
//!     let storage = Arc::new(FileStorage::new(config.cache_dir_path()));
//!     let api = SportApi::from_config(football::SPORT, &config, storage).await?;
//!
//!     let params = Params::new().set("team", 33).set("next", 5);
//!     let fixtures = api.fetch_keyed(&football::FIXTURES, &params).await?;
//!     println!("{} upcoming fixtures", fixtures.len());
//!
//!     // Make sure the snapshot hit the disk before exiting
//!     api.cache().flush().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod sports;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use api::{ApiClient, SportApi};
pub use cache::{CacheEntry, CacheStore, Params, derive_key};
pub use config::Config;
pub use error::AppError;
pub use sports::Sport;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
