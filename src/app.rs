//! One run of the program: obtain a forecast, total it per day, render it

use thiserror::Error;
use tracing::debug;

use crate::aggregate::Aggregator;
use crate::cache::{CacheManager, ForecastCache, ForecastError};
use crate::config::Config;
use crate::data::{SolcastClient, SolcastError, TimestampError};
use crate::report::render_report;
use crate::timezone::LocalZone;

/// Errors that end a run with exit code 1
#[derive(Debug, Error)]
pub enum AppError {
    /// No cache directory was configured and none could be derived
    #[error("Could not determine a cache directory; pass --cache-dir")]
    NoCacheDir,

    /// The HTTP client could not be set up
    #[error(transparent)]
    Client(#[from] SolcastError),

    /// Neither a fetch nor the cache produced a forecast
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// The forecast contained an unreadable timestamp
    #[error(transparent)]
    Aggregate(#[from] TimestampError),
}

/// Produces the report text for `config`
///
/// Nothing is printed here apart from cache and retry notices on stderr, so
/// a failed run produces no partial report.
pub async fn run(config: &Config) -> Result<String, AppError> {
    let zone = LocalZone::resolve(&config.timezone);
    let now = zone.now();
    debug!(now = %now, "starting run");

    let cache = match config.cache_dir {
        Some(ref dir) => CacheManager::with_dir(dir.clone()),
        None => CacheManager::new().ok_or(AppError::NoCacheDir)?,
    };
    let client = SolcastClient::new(config)?;

    let document = ForecastCache::new(cache, client, zone)
        .with_stale_after(config.stale_after)
        .with_refresh(config.refresh)
        .obtain(now)
        .await?;

    let rows = Aggregator::new(zone).aggregate(&document, now)?;
    debug!(days = rows.len(), "aggregated forecast");

    Ok(render_report(&rows, config.capacity_kwh()))
}
