use crate::cli::Args;
use sports_api_cache::api::SportApi;
use sports_api_cache::cache::{CacheStats, CacheStore, Hydration, NamespaceMode};
use sports_api_cache::config::Config;
use sports_api_cache::config::user_prompts::prompt_for_api_key;
use sports_api_cache::constants::cache_ttl;
use sports_api_cache::error::AppError;
use sports_api_cache::sports::Sport;
use tracing::{info, warn};

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.sport.is_none() && (args.has_cache_command() || args.endpoint.is_some()) {
        return Err(AppError::config_error(
            "A sport is required for cache and endpoint commands",
        ));
    }
    if args.refresh && args.endpoint.is_none() {
        return Err(AppError::config_error("--refresh needs an endpoint"));
    }
    if let Some(ttl_ms) = args.ttl_ms
        && ttl_ms > cache_ttl::MAX_MS
    {
        return Err(AppError::config_error(format!(
            "Cache TTL {ttl_ms}ms exceeds the maximum of {}ms",
            cache_ttl::MAX_MS
        )));
    }
    if args.clear_cache && args.endpoint.is_some() {
        return Err(AppError::config_error(
            "Cannot combine --clear-cache with an endpoint fetch",
        ));
    }
    Ok(())
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles the --set-api-key command, prompting when no key was given.
pub async fn handle_set_api_key_command(new_key: &str) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    let key = if new_key.trim().is_empty() {
        prompt_for_api_key().await?
    } else {
        new_key.trim().to_string()
    };
    if key.is_empty() {
        return Err(AppError::config_error("API key cannot be empty"));
    }

    config.api_key = key;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Prints the endpoints a sport caches.
pub fn handle_list_endpoints_command(sport: Sport) {
    let descriptor = sport.descriptor();
    println!("{} ({})", descriptor.name, descriptor.base_url);
    for route in descriptor.routes {
        let mode = match descriptor.manifest.find(route.namespace).map(|ns| ns.mode) {
            Some(NamespaceMode::Keyed) => "keyed",
            _ => "single",
        };
        println!("  {:<22} {:<7} {}", route.namespace, mode, route.path);
    }
}

fn print_stats(stats: &CacheStats, hydration: Hydration) {
    println!("Cache:   {}", stats.storage_name);
    println!(
        "Loaded:  {}",
        match hydration {
            Hydration::Hydrated => "from storage",
            Hydration::ColdStart => "cold start",
        }
    );
    println!("TTL:     {} ms", stats.ttl_ms);
    println!(
        "Entries: {} live / {} total",
        stats.live_entries(),
        stats.total_entries()
    );
    for ns in stats.namespaces.iter().filter(|ns| ns.total > 0) {
        println!("  {:<22} {:>4} live / {:>4} total", ns.name, ns.live, ns.total);
    }
}

/// Runs the cache maintenance flags in a fixed order: TTL, clear, purge, stats.
pub async fn handle_cache_commands(cache: &CacheStore, args: &Args) -> Result<(), AppError> {
    let storage_name = cache.manifest().storage_name;

    if let Some(ttl_ms) = args.ttl_ms {
        cache.set_cache_ttl(ttl_ms);
        info!("Cache TTL for {storage_name} set to {ttl_ms} ms");
        println!("Cache TTL set to {ttl_ms} ms");
    }

    if args.clear_cache {
        cache.clear_cache();
        println!("Cache cleared for {storage_name}");
    }

    if args.purge {
        cache.purge_persisted().await;
        println!("Persisted cache removed for {storage_name}");
    }

    if args.stats {
        print_stats(&cache.stats(), cache.hydration());
    }

    Ok(())
}

/// Fetches one endpoint through the cache and prints the payload as pretty JSON.
pub async fn handle_fetch_command(
    api: &SportApi,
    endpoint: &str,
    args: &Args,
) -> Result<(), AppError> {
    let params = args.query_params();
    let result = if args.refresh {
        api.refresh_raw(endpoint, &params).await
    } else {
        api.fetch_raw(endpoint, &params).await
    };
    let payload = match result {
        Ok(payload) => payload,
        Err(e) if e.is_not_found() => {
            warn!("No data for {endpoint}: {e}");
            eprintln!(
                "No {} data for '{endpoint}' with these parameters",
                api.sport().name
            );
            return Err(e);
        }
        Err(e) => return Err(e),
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
