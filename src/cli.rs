//! Command-line interface parsing for Solcast Daily
//!
//! This module handles parsing of CLI arguments using clap. Every flag is
//! optional and overrides the matching environment setting.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::Config;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The battery capacity is not a positive number
    #[error("Invalid battery capacity: '{0}'. Expected a positive number of kWh")]
    InvalidCapacity(String),
}

/// Solcast Daily - Print daily rooftop PV energy forecasts
#[derive(Parser, Debug)]
#[command(name = "solcast-daily")]
#[command(about = "Daily rooftop PV energy totals from the Solcast forecast API")]
#[command(version)]
pub struct Cli {
    /// Battery capacity in kWh for the percent column [env: SOLCAST_BATTERY_KWH]
    #[arg(long, value_name = "KWH", value_parser = parse_capacity_arg)]
    pub battery_kwh: Option<f64>,

    /// Time zone for local day boundaries, e.g. America/Chicago [env: SOLCAST_TIMEZONE]
    #[arg(long, value_name = "ZONE")]
    pub timezone: Option<String>,

    /// Directory for the cached forecast (defaults to the user cache directory)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Fetch a new forecast even if today's is cached
    #[arg(long)]
    pub refresh: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses a battery capacity argument.
///
/// # Arguments
/// * `s` - The capacity string from CLI
///
/// # Returns
/// * `Ok(f64)` if the string is a positive, finite number
/// * `Err(CliError::InvalidCapacity)` otherwise
pub fn parse_capacity_arg(s: &str) -> Result<f64, CliError> {
    match s.trim().parse::<f64>() {
        Ok(kwh) if kwh > 0.0 && kwh.is_finite() => Ok(kwh),
        _ => Err(CliError::InvalidCapacity(s.to_string())),
    }
}

impl Cli {
    /// Applies command-line overrides on top of `config`
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(kwh) = self.battery_kwh {
            config.battery_kwh = kwh;
        }
        if let Some(ref tz) = self.timezone {
            config.timezone = tz.clone();
        }
        if let Some(ref dir) = self.cache_dir {
            config.cache_dir = Some(dir.clone());
        }
        config.refresh |= self.refresh;
        config
    }
}
