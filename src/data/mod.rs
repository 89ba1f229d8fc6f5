//! Core data models for Solcast Daily
//!
//! This module contains the forecast document as returned by the Solcast
//! rooftop API (and stored in the cache), plus the per-day totals derived
//! from it.

pub mod parse;
pub mod solcast;

pub use parse::{duration_hours, normalize_timestamp, parse_period_end, TimestampError};
pub use solcast::{dns_retry_status, ForecastSource, SolcastClient, SolcastError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A forecast document as returned by `/rooftop_sites/{id}/forecasts`
///
/// Fields other than `forecasts` are kept so that a cached copy matches
/// what the API sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    /// Forecast intervals in API order
    #[serde(default)]
    pub forecasts: Vec<ForecastInterval>,
    /// Any other top-level fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One sub-hourly forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInterval {
    /// End of the interval, UTC (e.g. `2025-08-10T04:00:00.0000000Z`)
    pub period_end: String,
    /// ISO-8601 duration of the interval (e.g. `PT30M`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Mean forecast power in kW
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_estimate: Option<f64>,
    /// 90th percentile forecast power in kW
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv_estimate90: Option<f64>,
    /// Fields not used for daily totals (e.g. `pv_estimate10`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ForecastInterval {
    /// Mean power, zero when absent
    pub fn mean_kw(&self) -> f64 {
        self.pv_estimate.unwrap_or(0.0)
    }

    /// Optimistic power, the mean when absent
    pub fn optimistic_kw(&self) -> f64 {
        self.pv_estimate90.unwrap_or_else(|| self.mean_kw())
    }
}

/// Energy totals for one local calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyTotal {
    /// Local calendar date
    pub date: NaiveDate,
    /// Energy from `pv_estimate`, in kWh
    pub kwh_mean: f64,
    /// Energy from `pv_estimate90`, in kWh
    pub kwh_opt: f64,
    /// Whether this row covers only the rest of today
    pub is_today: bool,
}

impl DailyTotal {
    /// Optimistic energy as a percentage of `capacity_kwh`
    pub fn optimistic_percent(&self, capacity_kwh: f64) -> f64 {
        if capacity_kwh > 0.0 {
            self.kwh_opt / capacity_kwh * 100.0
        } else {
            0.0
        }
    }
}
