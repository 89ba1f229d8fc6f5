//! Cache module for the Solcast forecast document
//!
//! `CacheManager` owns the single cache file on disk; `ForecastCache`
//! decides per run whether to reuse it, delete it, or fetch a new one and
//! fall back to the cached copy when the fetch fails.

mod forecast;
mod manager;

pub use forecast::{ForecastCache, ForecastError};
pub use manager::{CacheError, CacheManager, CACHE_FILE_NAME};
