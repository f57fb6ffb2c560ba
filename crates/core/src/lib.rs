//! Fuel Dashboard Core Library
//!
//! Shared pieces for the dashboard crates:
//! - Configuration loading (XDG-compliant)
//! - Numeric coercion and display formatting
//! - Application defaults

mod config;
pub mod format;

pub use config::{config_candidates, find_config_file, load_config, ConfigSource};
pub use format::{coerce_f64, parse_f64, DecimalFormat};

/// Application name used for config paths
pub const APP_NAME: &str = "fuel-dash";

/// Default API root of the telemetry backend
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Default number of historical records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Quiet window applied to search input before a term is committed
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

/// Per-request timeout handed to the HTTP client
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
