use crate::cli::Args;
use sports_api_cache::config::Config;
use sports_api_cache::constants::APP_NAME;
use sports_api_cache::error::AppError;
use std::io::stderr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the filter for one layer: `RUST_LOG` plus a default directive for this crate.
fn crate_filter(level: &str) -> Result<EnvFilter, AppError> {
    let directive = format!("{APP_NAME}={level}")
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Invalid log directive: {e}")))?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

/// Splits the configured log path into directory and file name.
///
/// `--log-file` wins over the config file; without either, logs go to
/// `<config dir>/logs/sports_api_cache.log`.
fn resolve_log_location(args: &Args, config: &Config) -> (String, String) {
    let default_file_name = format!("{APP_NAME}.log");
    let custom_log_path = args.log_file.as_ref().or(config.log_file_path.as_ref());
    match custom_log_path {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .unwrap_or(default_file_name);
            (parent.to_string_lossy().to_string(), file_name)
        }
        None => (Config::get_log_dir_path(), default_file_name),
    }
}

/// Sets up logging configuration for the application.
///
/// - Default: logs only to file at info level, stdout is reserved for JSON output
/// - `--debug`: logs to stderr and file at debug level
/// - Creates log directory if it doesn't exist
/// - Uses daily rolling file appender
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(args: &Args, config: &Config) -> Result<(String, WorkerGuard), AppError> {
    let (log_dir, log_file_name) = resolve_log_location(args, config);

    // Create log directory if it doesn't exist
    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    // Set up a rolling file appender that creates a new log file each day
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let level = if args.debug { "debug" } else { "info" };
    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(crate_filter(level)?);

    let registry = tracing_subscriber::registry().with(file_layer);

    let result = if args.debug {
        registry
            .with(
                fmt::Layer::new()
                    .with_writer(stderr)
                    .with_ansi(true)
                    .with_filter(crate_filter(level)?),
            )
            .try_init()
    } else {
        registry.try_init()
    };
    result.map_err(|e| AppError::log_setup_error(format!("Failed to install subscriber: {e}")))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_resolve_log_location_prefers_cli() {
        let args = Args::parse_from(["sports_api_cache", "--log-file", "/tmp/cli/run.log"]);
        let config = Config {
            log_file_path: Some("/var/log/from-config.log".to_string()),
            ..Config::default()
        };
        assert_eq!(
            resolve_log_location(&args, &config),
            ("/tmp/cli".to_string(), "run.log".to_string())
        );

        let args = Args::parse_from(["sports_api_cache"]);
        assert_eq!(
            resolve_log_location(&args, &config),
            ("/var/log".to_string(), "from-config.log".to_string())
        );
    }

    #[test]
    fn test_resolve_log_location_defaults() {
        let args = Args::parse_from(["sports_api_cache"]);
        let (dir, file) = resolve_log_location(&args, &Config::default());
        assert_eq!(dir, Config::get_log_dir_path());
        assert_eq!(file, "sports_api_cache.log");

        let args = Args::parse_from(["sports_api_cache", "--log-file", "bare.log"]);
        let (dir, file) = resolve_log_location(&args, &Config::default());
        assert_eq!(dir, ".");
        assert_eq!(file, "bare.log");
    }
}
