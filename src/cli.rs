use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use sports_api_cache::cache::Params;
use sports_api_cache::sports::Sport;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Parses a `name=value` query parameter.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

/// API-Sports cache inspector
///
/// Fetches one endpoint of one sport through the persisted TTL cache and
/// prints the payload as JSON. A second run within the TTL is served from
/// the cache without touching the network.
///
/// Without an endpoint, lists the endpoints the sport caches.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Sport to query
    #[arg(value_enum)]
    pub sport: Option<Sport>,

    /// Cache namespace of the endpoint, e.g. `fixtures` or `countries`
    pub endpoint: Option<String>,

    /// Query parameter as NAME=VALUE. Repeat for several parameters.
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Skip the cache lookup and overwrite the entry with a fresh response
    #[arg(short = 'r', long = "refresh")]
    pub refresh: bool,

    /// Print entry counts for the sport's cache
    #[arg(long = "stats", help_heading = "Cache")]
    pub stats: bool,

    /// Drop every cached entry of the sport, keeping its TTL
    #[arg(long = "clear-cache", help_heading = "Cache")]
    pub clear_cache: bool,

    /// Delete the sport's persisted cache file
    #[arg(long = "purge", help_heading = "Cache")]
    pub purge: bool,

    /// Set the sport's cache TTL in milliseconds before running. The value is persisted.
    #[arg(long = "ttl-ms", value_name = "MILLIS", help_heading = "Cache")]
    pub ttl_ms: Option<u64>,

    /// Update API key in config. Will prompt for the key if not provided.
    #[arg(
        long = "set-api-key",
        help_heading = "Configuration",
        value_name = "API_KEY",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub new_api_key: Option<String>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Also log to the terminal at debug level
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

impl Args {
    /// Query parameters in the order given on the command line
    pub fn query_params(&self) -> Params {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    /// True when any cache maintenance flag is set
    pub fn has_cache_command(&self) -> bool {
        self.stats || self.clear_cache || self.purge || self.ttl_ms.is_some()
    }

    /// True when only configuration is touched and no sport is needed
    pub fn is_config_command(&self) -> bool {
        self.list_config || self.new_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sports_api_cache::cache::derive_key;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("team=33"),
            Ok(("team".to_string(), "33".to_string()))
        );
        assert_eq!(
            parse_param("date=2024-01-01=x"),
            Ok(("date".to_string(), "2024-01-01=x".to_string()))
        );
        assert_eq!(parse_param("search="), Ok(("search".to_string(), String::new())));
        assert!(parse_param("team").is_err());
        assert!(parse_param("=33").is_err());
    }

    #[test]
    fn test_args_build_params() {
        let args = Args::parse_from([
            "sports_api_cache",
            "football",
            "fixtures",
            "-p",
            "team=33",
            "--param",
            "next=5",
        ]);
        assert_eq!(args.sport, Some(Sport::Football));
        assert_eq!(args.endpoint.as_deref(), Some("fixtures"));
        assert!(!args.has_cache_command());

        let params = args.query_params();
        assert_eq!(derive_key("fixtures", Some(&params)), "fixtures:next=5&team=33");
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from(["sports_api_cache", "f1", "--stats", "--ttl-ms", "1000"]);
        assert_eq!(args.sport, Some(Sport::Formula1));
        assert!(args.has_cache_command());
        assert_eq!(args.ttl_ms, Some(1000));

        let args = Args::parse_from(["sports_api_cache", "--set-api-key"]);
        assert_eq!(args.new_api_key.as_deref(), Some(""));
        assert!(args.is_config_command());
        assert_eq!(args.sport, None);
    }
}
