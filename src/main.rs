// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::Args;
use sports_api_cache::api::SportApi;
use sports_api_cache::cache::{CacheStore, FileStorage, StorageAdapter, StoreOptions};
use sports_api_cache::config::Config;
use sports_api_cache::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    commands::validate_args(&args)?;

    // Configuration commands run before logging so they work without a valid config
    if args.is_config_command() {
        if let Some(new_key) = &args.new_api_key {
            return commands::handle_set_api_key_command(new_key).await;
        }
        return commands::handle_list_config_command().await;
    }

    let config = Config::load().await?;
    let (log_file_path, _guard) = logging::setup_logging(&args, &config).await?;
    info!("Logs are being written to: {log_file_path}");

    let Some(sport) = args.sport else {
        return Err(AppError::config_error(
            "No sport given. Run with --help for usage",
        ));
    };

    if args.endpoint.is_none() && !args.has_cache_command() {
        commands::handle_list_endpoints_command(sport);
        return Ok(());
    }

    let cache_dir = config.cache_dir_path();
    debug!("Using cache directory {}", cache_dir.display());
    let storage: Arc<dyn StorageAdapter> = Arc::new(FileStorage::new(cache_dir));
    let descriptor = sport.descriptor();

    match &args.endpoint {
        Some(endpoint) => {
            let api = SportApi::from_config(descriptor, &config, storage).await?;
            commands::handle_cache_commands(api.cache(), &args).await?;
            let result = commands::handle_fetch_command(&api, endpoint, &args).await;
            api.cache().flush().await;
            result
        }
        None => {
            // Maintenance only: no API key needed
            let options = StoreOptions::default().with_ttl(config.cache_ttl_ms);
            let cache = CacheStore::load(descriptor.manifest, storage, options).await;
            commands::handle_cache_commands(&cache, &args).await?;
            cache.flush().await;
            Ok(())
        }
    }
}
