//! Local time zone resolution
//!
//! Day boundaries are taken from a named IANA zone when it is known, and
//! from the host's local zone otherwise. Both variants hand out
//! `DateTime<FixedOffset>` so callers never care which one is in use.

use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

/// The zone used for local calendar days
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalZone {
    /// A zone from the IANA database
    Named(Tz),
    /// Whatever the host reports, including its DST rules
    Host,
}

impl LocalZone {
    /// Resolves a zone name, falling back to the host zone if it is unknown
    pub fn resolve(name: &str) -> Self {
        match name.parse::<Tz>() {
            Ok(tz) => {
                debug!(zone = tz.name(), "using named time zone");
                LocalZone::Named(tz)
            }
            Err(_) => {
                warn!(zone = %name, "unknown time zone, falling back to host local time");
                LocalZone::Host
            }
        }
    }

    /// Current wall-clock time in this zone
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.from_utc(&Utc::now())
    }

    /// Converts an absolute instant into this zone
    pub fn from_utc(&self, instant: &DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            LocalZone::Named(tz) => instant.with_timezone(tz).fixed_offset(),
            LocalZone::Host => instant.with_timezone(&Local).fixed_offset(),
        }
    }

    /// Converts a filesystem timestamp into this zone
    pub fn from_system_time(&self, time: SystemTime) -> DateTime<FixedOffset> {
        self.from_utc(&DateTime::<Utc>::from(time))
    }

    /// Formats an instant as `YYYY-MM-DD HH:MM ZONE`
    ///
    /// Named zones print their abbreviation (e.g. `CDT`); the host zone
    /// prints its numeric offset.
    pub fn format_timestamp(&self, instant: &DateTime<Utc>) -> String {
        match self {
            LocalZone::Named(tz) => instant
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M %Z")
                .to_string(),
            LocalZone::Host => instant
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M %:z")
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_resolve_known_zone() {
        assert_eq!(
            LocalZone::resolve("America/Chicago"),
            LocalZone::Named(chrono_tz::America::Chicago)
        );
    }

    #[test]
    fn test_resolve_unknown_zone_falls_back_to_host() {
        assert_eq!(LocalZone::resolve("Mars/Olympus_Mons"), LocalZone::Host);
    }

    #[test]
    fn test_from_utc_applies_daylight_saving() {
        let zone = LocalZone::resolve("America/Chicago");

        let summer = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap();
        let local = zone.from_utc(&summer);
        assert_eq!(local.offset().local_minus_utc(), -5 * 3600);

        let winter = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let local = zone.from_utc(&winter);
        assert_eq!(local.offset().local_minus_utc(), -6 * 3600);
    }

    #[test]
    fn test_from_utc_changes_calendar_date() {
        let zone = LocalZone::resolve("America/Chicago");
        let late_utc = Utc.with_ymd_and_hms(2025, 8, 11, 2, 30, 0).unwrap();

        let local = zone.from_utc(&late_utc);

        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2025, 8, 10).unwrap());
        assert_eq!(local, late_utc);
    }

    #[test]
    fn test_format_timestamp_named_zone() {
        let zone = LocalZone::resolve("America/Chicago");
        let instant = Utc.with_ymd_and_hms(2025, 8, 10, 14, 5, 0).unwrap();

        assert_eq!(zone.format_timestamp(&instant), "2025-08-10 09:05 CDT");
    }
}
