//! Fetch-or-reuse policy for the forecast cache
//!
//! Decides per run whether the cached document can be used as is, whether
//! it is too old to keep, and whether it may stand in for a failed fetch.

use chrono::{DateTime, FixedOffset, TimeDelta};
use thiserror::Error;
use tracing::{debug, warn};

use super::{CacheError, CacheManager};
use crate::data::{ForecastDocument, ForecastSource, SolcastError};
use crate::timezone::LocalZone;

/// Failure to produce any forecast document
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The fetch failed and there was no usable cached document
    #[error("Could not fetch Solcast forecast and no cache exists.\n{0}")]
    Unavailable(#[source] SolcastError),

    /// The cache directory could not be created
    #[error(transparent)]
    CacheDir(#[from] CacheError),
}

/// What the cache looked like at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheState {
    /// No cache file, or its age could not be determined
    Missing,
    /// Written on the current local day
    SameDay,
    /// Older than today but young enough to fall back on
    Usable,
    /// Past the staleness threshold and could not be deleted
    Stale,
}

/// Obtains a forecast document from the cache or a [`ForecastSource`]
pub struct ForecastCache<S> {
    cache: CacheManager,
    source: S,
    zone: LocalZone,
    stale_after: TimeDelta,
    refresh: bool,
}

impl<S: ForecastSource> ForecastCache<S> {
    /// Creates a cache policy with the default three-day staleness limit
    pub fn new(cache: CacheManager, source: S, zone: LocalZone) -> Self {
        Self {
            cache,
            source,
            zone,
            stale_after: TimeDelta::days(3),
            refresh: false,
        }
    }

    /// Sets the age after which the cache file is deleted
    pub fn with_stale_after(mut self, stale_after: TimeDelta) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Fetch even when a same-day cache exists
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Returns a forecast document for `now`
    ///
    /// - A cache file older than the staleness limit is deleted and never used
    /// - A cache file written on `now`'s local day is returned without fetching
    /// - Otherwise the source is asked; a successful result replaces the cache
    /// - If the source fails, a remaining cache file is used with a warning
    ///
    /// # Returns
    /// * `Ok(ForecastDocument)` - Fetched or cached document
    /// * `Err(ForecastError::Unavailable)` - The fetch failed and nothing usable was cached
    pub async fn obtain(&self, now: DateTime<FixedOffset>) -> Result<ForecastDocument, ForecastError> {
        self.cache.ensure_dir()?;

        let state = self.inspect(now);

        if state == CacheState::SameDay && !self.refresh {
            match self.cache.read() {
                Ok(document) => {
                    debug!(path = %self.cache.path().display(), "using same-day cache");
                    return Ok(document);
                }
                Err(e) => warn!(error = %e, "same-day cache is unreadable, fetching"),
            }
        }

        match self.source.fetch_forecast().await {
            Ok(document) => {
                if let Err(e) = self.cache.write(&document) {
                    warn!(error = %e, "could not save forecast to cache");
                }
                Ok(document)
            }
            Err(err) => self.fall_back(state, err),
        }
    }

    /// Classifies the cache file, deleting it when it is too old
    fn inspect(&self, now: DateTime<FixedOffset>) -> CacheState {
        if !self.cache.exists() {
            return CacheState::Missing;
        }

        let modified = match self.cache.modified() {
            Ok(time) => self.zone.from_system_time(time),
            Err(e) => {
                debug!(error = %e, "cache age unknown");
                return CacheState::Missing;
            }
        };

        if now.signed_duration_since(modified) > self.stale_after {
            return match self.cache.remove() {
                Ok(()) => {
                    eprintln!(
                        "Info: deleted stale Solcast cache (>{} old).",
                        describe_age(self.stale_after)
                    );
                    CacheState::Missing
                }
                Err(e) => {
                    warn!(error = %e, "could not delete stale cache");
                    CacheState::Stale
                }
            };
        }

        if modified.date_naive() == now.date_naive() {
            CacheState::SameDay
        } else {
            CacheState::Usable
        }
    }

    /// Uses the cached document in place of a failed fetch, if allowed
    fn fall_back(&self, state: CacheState, err: SolcastError) -> Result<ForecastDocument, ForecastError> {
        if state == CacheState::Stale || !self.cache.exists() {
            return Err(ForecastError::Unavailable(err));
        }

        let document = match self.cache.read() {
            Ok(document) => document,
            Err(e) => {
                debug!(error = %e, "cached forecast is unusable");
                return Err(ForecastError::Unavailable(err));
            }
        };

        let stamp = self
            .cache
            .modified()
            .map(|time| self.zone.format_timestamp(&time.into()))
            .unwrap_or_else(|_| "unknown time".to_string());

        eprintln!("Warning: fetch failed ({err}); using cached forecast from {stamp}.");
        Ok(document)
    }
}

/// Renders a staleness limit as whole days, or hours below one day
fn describe_age(age: TimeDelta) -> String {
    match age.num_days() {
        0 => format!("{} hours", age.num_hours()),
        1 => "1 day".to_string(),
        days => format!("{days} days"),
    }
}
