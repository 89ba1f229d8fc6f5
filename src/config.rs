//! Runtime configuration for Solcast Daily
//!
//! All settings live in an explicit `Config` value that is handed to the
//! client, the cache and the aggregator. Nothing reads the process
//! environment after `Config::from_env` has run.

use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use tracing::warn;

/// Default origin of the Solcast API
pub const DEFAULT_BASE_URL: &str = "https://api.solcast.com.au";

/// Battery capacity used for the percent column when none is configured
pub const DEFAULT_BATTERY_KWH: f64 = 15.0;

/// Zone used for day boundaries unless overridden
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// Environment variable names
pub const ENV_API_KEY: &str = "SOLCAST_API_KEY";
pub const ENV_SITE_ID: &str = "SOLCAST_SITE_ID";
pub const ENV_BASE_URL: &str = "SOLCAST_BASE_URL";
pub const ENV_BATTERY_KWH: &str = "SOLCAST_BATTERY_KWH";
pub const ENV_TIMEZONE: &str = "SOLCAST_TIMEZONE";

/// Settings shared by the fetch, cache and aggregation steps
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the Solcast API
    pub api_key: String,
    /// Rooftop site identifier
    pub site_id: String,
    /// API origin, without trailing slash
    pub base_url: String,
    /// Battery capacity in kWh for the percent-of-capacity column
    pub battery_kwh: f64,
    /// IANA zone name used for local day boundaries
    pub timezone: String,
    /// Cache directory override; `None` uses the per-user cache directory
    pub cache_dir: Option<PathBuf>,
    /// Fetch even when a same-day cache exists
    pub refresh: bool,
    /// Upper bound for a single HTTP request
    pub request_timeout: Duration,
    /// Extra attempts made after a DNS resolution failure
    pub dns_retries: u32,
    /// Delay before the first DNS retry, doubled after each attempt
    pub retry_base_delay: Duration,
    /// Cache records older than this are deleted
    pub stale_after: TimeDelta,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            site_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            battery_kwh: DEFAULT_BATTERY_KWH,
            timezone: DEFAULT_TIMEZONE.to_string(),
            cache_dir: None,
            refresh: false,
            request_timeout: Duration::from_secs(20),
            dns_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            stale_after: TimeDelta::days(3),
        }
    }
}

impl Config {
    /// Builds a config from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup
    ///
    /// Values are trimmed and empty values count as unset. A battery
    /// capacity that is not a positive number falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Config::default();

        if let Some(key) = get(ENV_API_KEY) {
            config.api_key = key;
        }
        if let Some(site) = get(ENV_SITE_ID) {
            config.site_id = site;
        }
        if let Some(url) = get(ENV_BASE_URL) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(tz) = get(ENV_TIMEZONE) {
            config.timezone = tz;
        }
        if let Some(raw) = get(ENV_BATTERY_KWH) {
            match raw.parse::<f64>() {
                Ok(kwh) if kwh > 0.0 && kwh.is_finite() => config.battery_kwh = kwh,
                _ => warn!(
                    value = %raw,
                    "ignoring invalid {}, using {} kWh",
                    ENV_BATTERY_KWH,
                    DEFAULT_BATTERY_KWH
                ),
            }
        }

        config
    }

    /// Battery capacity suitable as a divisor
    pub fn capacity_kwh(&self) -> f64 {
        if self.battery_kwh > 0.0 {
            self.battery_kwh
        } else {
            DEFAULT_BATTERY_KWH
        }
    }

    /// True when both credentials needed for a fetch are present
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.site_id.is_empty()
    }
}
