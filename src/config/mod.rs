//! Environment-driven configuration.
//!
//! Values are read once at startup (after `.env` has been loaded by the
//! binary). Missing or unparsable variables fall back to their defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SETTINGS_PATH: &str = "copper_settings.json";
pub const DEFAULT_MARKET_DATA_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_FETCH_RETRIES: usize = 2;

/// Current deployment environment (`APP_ENV`), defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Settings for the chart-data endpoint.
#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub base_url: String,
    /// Prefix such as `https://corsproxy.io/?`; the encoded target URL is appended.
    pub proxy_url: Option<String>,
    pub interval: String,
    pub range: String,
    pub timeout: Duration,
    pub retries: usize,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MARKET_DATA_BASE_URL.to_string(),
            proxy_url: None,
            interval: "1d".to_string(),
            range: "1y".to_string(),
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECONDS),
            retries: DEFAULT_FETCH_RETRIES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub settings_path: PathBuf,
    pub market_data: MarketDataConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            port: DEFAULT_PORT,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            market_data: MarketDataConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = MarketDataConfig::default();

        let market_data = MarketDataConfig {
            base_url: env::var("MARKET_DATA_BASE_URL").unwrap_or(defaults.base_url),
            proxy_url: env::var("CORS_PROXY_URL")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            interval: env::var("CHART_INTERVAL").unwrap_or(defaults.interval),
            range: env::var("CHART_RANGE").unwrap_or(defaults.range),
            timeout: Duration::from_secs(parse_var(
                "FETCH_TIMEOUT_SECONDS",
                DEFAULT_FETCH_TIMEOUT_SECONDS,
            )),
            retries: parse_var("FETCH_RETRIES", DEFAULT_FETCH_RETRIES),
        };

        Self {
            environment: get_environment(),
            port: parse_var("PORT", DEFAULT_PORT),
            settings_path: env::var("SETTINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH)),
            market_data,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
