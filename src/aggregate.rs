//! Daily energy totals from forecast intervals
//!
//! Each interval contributes `power × duration` to the local calendar day
//! its `period_end` falls on. For the current day only intervals ending at
//! or after "now" are counted, giving the energy still to come today.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::data::parse::DEFAULT_PERIOD;
use crate::data::{duration_hours, parse_period_end, DailyTotal, ForecastDocument, TimestampError};
use crate::timezone::LocalZone;

/// Buckets forecast intervals into local calendar days
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    zone: LocalZone,
}

impl Aggregator {
    pub fn new(zone: LocalZone) -> Self {
        Self { zone }
    }

    /// Sums mean and optimistic energy per local day, ascending by date
    ///
    /// An interval without a `period` reuses the previous interval's value,
    /// or `PT30M` if there is none yet.
    ///
    /// # Returns
    /// * `Ok(Vec<DailyTotal>)` - One row per day, empty for an empty document
    /// * `Err(TimestampError)` - An interval's `period_end` could not be parsed
    pub fn aggregate(
        &self,
        document: &ForecastDocument,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<DailyTotal>, TimestampError> {
        let Some(first) = document.forecasts.first() else {
            return Ok(Vec::new());
        };

        let today = now.date_naive();
        let mut last_period = non_empty(first.period.as_deref())
            .unwrap_or(DEFAULT_PERIOD)
            .to_string();
        let mut sums: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

        for interval in &document.forecasts {
            if let Some(period) = non_empty(interval.period.as_deref()) {
                last_period = period.to_string();
            }
            let hours = duration_hours(&last_period);

            let end = self.zone.from_utc(&parse_period_end(&interval.period_end)?);
            let day = end.date_naive();

            if day == today && end < now {
                continue;
            }

            let (mean, opt) = sums.entry(day).or_insert((0.0, 0.0));
            *mean += interval.mean_kw() * hours;
            *opt += interval.optimistic_kw() * hours;
        }

        Ok(sums
            .into_iter()
            .map(|(date, (kwh_mean, kwh_opt))| DailyTotal {
                date,
                kwh_mean,
                kwh_opt,
                is_today: date == today,
            })
            .collect())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
