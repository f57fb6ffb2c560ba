use clap::Parser;
use fuel_dash_core::{
    find_config_file, load_config, ConfigSource, DecimalFormat, DEFAULT_API_URL,
    DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SEARCH_DEBOUNCE_MS,
};
use slog::{o, Drain, Level, Logger};
use std::{env, time::Duration};

use crate::{DashboardOptions, FilterSnapshot, FilterValue};

#[derive(Parser, Clone, Debug, serde::Deserialize, Default)]
#[command(
    author,
    version,
    about = "Fuel Dashboard - Terminal client for fuel sales telemetry"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $FUEL_DASH_CONFIG, ./dashboard.toml,
    /// $XDG_CONFIG_HOME/fuel-dash/dashboard.toml, /etc/fuel-dash/dashboard.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "FUEL_DASH_LEVEL")]
    pub level: Option<String>,

    /// API root of the telemetry backend
    #[arg(short, long, env = "FUEL_DASH_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token sent with every API request
    #[arg(short, long, env = "FUEL_DASH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Historical records per page
    #[arg(long, env = "FUEL_DASH_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long, env = "FUEL_DASH_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Quiet window in milliseconds before a search term is applied
    #[arg(long, env = "FUEL_DASH_SEARCH_DEBOUNCE_MS")]
    pub search_debounce_ms: Option<u64>,

    /// Decimal separator for displayed values ('.' or ',')
    #[arg(long, env = "FUEL_DASH_DECIMAL_SEPARATOR")]
    pub decimal_separator: Option<char>,

    /// HTTP User-Agent header for API requests
    #[arg(short, long, env = "FUEL_DASH_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Initial fuel type filter ("todos" for all)
    #[arg(long, env = "FUEL_DASH_FUEL")]
    pub fuel: Option<String>,

    /// Initial state (UF) filter ("todos" for all)
    #[arg(long, env = "FUEL_DASH_STATE")]
    pub state: Option<String>,

    /// Initial vehicle type filter ("todos" for all)
    #[arg(long, env = "FUEL_DASH_VEHICLE")]
    pub vehicle: Option<String>,
}

impl Cli {
    /// Get the effective configuration value with defaults
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms.unwrap_or(DEFAULT_SEARCH_DEBOUNCE_MS))
    }

    pub fn decimal_format(&self) -> DecimalFormat {
        DecimalFormat::new(self.decimal_separator.unwrap_or('.'))
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("fuel-dash/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn filters(&self) -> FilterSnapshot {
        let parse = |raw: &Option<String>| -> FilterValue {
            raw.as_deref()
                .map(|v| v.parse().unwrap_or_default())
                .unwrap_or_default()
        };
        FilterSnapshot::new(parse(&self.fuel), parse(&self.state), parse(&self.vehicle))
    }

    pub fn dashboard_options(&self) -> DashboardOptions {
        DashboardOptions {
            page_size: self.page_size(),
            search_debounce: self.search_debounce(),
            format: self.decimal_format(),
            filters: self.filters(),
        }
    }

    /// Values from `self` win, gaps are filled from `file`.
    pub fn merge(self, file: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file.level),
            base_url: self.base_url.or(file.base_url),
            token: self.token.or(file.token),
            page_size: self.page_size.or(file.page_size),
            request_timeout: self.request_timeout.or(file.request_timeout),
            search_debounce_ms: self.search_debounce_ms.or(file.search_debounce_ms),
            decimal_separator: self.decimal_separator.or(file.decimal_separator),
            user_agent: self.user_agent.or(file.user_agent),
            fuel: self.fuel.or(file.fuel),
            state: self.state.or(file.state),
            vehicle: self.vehicle.or(file.vehicle),
        }
    }
}

/// Load configuration from CLI args, config file, and environment
pub fn get_config_info() -> (Cli, ConfigSource) {
    let cli_args = Cli::parse();

    let source = match cli_args.config {
        Some(ref path) => ConfigSource::Explicit(path.into()),
        None => find_config_file("FUEL_DASH_CONFIG", "dashboard.toml"),
    };

    // env vars are already folded into cli_args by clap
    let file_config: Cli = load_config(&source).unwrap_or_default();
    (cli_args.merge(file_config), source)
}

fn parse_level(raw: &str) -> Level {
    match raw.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "warn" | "warning" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

pub fn setup_logger(cli: &Cli) -> Logger {
    let log_level = match cli.level.as_ref() {
        Some(level) => parse_level(level),
        None => parse_level(&env::var("RUST_LOG").unwrap_or_default()),
    };

    let decorator = slog_term::TermDecorator::new().stderr().build();
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = drain.filter_level(log_level).fuse();
    slog::Logger::root(drain, o!("version" => env!("CARGO_PKG_VERSION")))
}
