//! Parsers for the duration and timestamp strings in Solcast forecasts
//!
//! Both are small pure functions with explicit fallbacks: a malformed
//! duration becomes half an hour, a malformed timestamp is an error.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

/// Duration assumed for a missing or unrecognised `period`
pub const DEFAULT_PERIOD_HOURS: f64 = 0.5;

/// `period` assumed when the first interval has none
pub const DEFAULT_PERIOD: &str = "PT30M";

/// Digits kept after the decimal point of a timestamp
const FRACTION_DIGITS: usize = 6;

/// A `period_end` value that is not an ISO-8601 instant
#[derive(Debug, Error, PartialEq)]
#[error("Invalid period_end timestamp: '{0}'")]
pub struct TimestampError(pub String);

/// Converts an ISO-8601 time duration of the form `PT#H#M#S` to hours
///
/// Each component is optional but they must appear in H, M, S order.
/// Anything else yields [`DEFAULT_PERIOD_HOURS`].
pub fn duration_hours(iso: &str) -> f64 {
    match duration_components(iso) {
        Some((h, m, s)) => h + m / 60.0 + s / 3600.0,
        None => DEFAULT_PERIOD_HOURS,
    }
}

/// Splits `PT#H#M#S` into hours, minutes and seconds
fn duration_components(iso: &str) -> Option<(f64, f64, f64)> {
    const DESIGNATORS: [u8; 3] = [b'H', b'M', b'S'];

    let mut rest = iso.strip_prefix("PT")?;
    let mut values = [0.0; 3];
    let mut next = 0;

    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let designator = *rest.as_bytes().get(digits)?;
        let slot = DESIGNATORS[next..].iter().position(|d| *d == designator)? + next;

        values[slot] = rest[..digits].parse::<f64>().ok()?;
        next = slot + 1;
        rest = &rest[digits + 1..];
    }

    Some((values[0], values[1], values[2]))
}

/// Rewrites a timestamp into a form chrono parses with a fixed format
///
/// A trailing `Z` becomes `+00:00`. Fractional seconds are truncated (never
/// rounded) or zero-padded to six digits, and a fraction without an offset
/// is taken to be UTC.
pub fn normalize_timestamp(raw: &str) -> String {
    let s = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_string(),
    };

    let Some((head, tail)) = s.split_once('.') else {
        return s;
    };

    let (fraction, offset) = match tail.rfind(&['+', '-'][..]) {
        Some(pos) => (&tail[..pos], &tail[pos..]),
        None => (tail, "+00:00"),
    };
    let fraction: String = fraction.chars().take(FRACTION_DIGITS).collect();

    format!("{head}.{fraction:0<width$}{offset}", width = FRACTION_DIGITS)
}

/// Parses a forecast `period_end` into an absolute UTC instant
///
/// Accepts a `Z` suffix, an explicit offset, and up to seven (or more)
/// fractional digits. A timestamp with no offset at all is read as UTC.
pub fn parse_period_end(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let normalized = normalize_timestamp(raw.trim());

    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn assert_hours(iso: &str, expected: f64) {
        let actual = duration_hours(iso);
        assert!(
            (actual - expected).abs() < 1e-12,
            "duration_hours({iso:?}) = {actual}, expected {expected}"
        );
    }

    #[test]
    fn test_duration_hours_components() {
        assert_hours("PT30M", 0.5);
        assert_hours("PT5M", 5.0 / 60.0);
        assert_hours("PT1H", 1.0);
        assert_hours("PT1H30M", 1.5);
        assert_hours("PT45S", 45.0 / 3600.0);
        assert_hours("PT2H15M36S", 2.0 + 15.0 / 60.0 + 36.0 / 3600.0);
        assert_hours("PT1H20S", 1.0 + 20.0 / 3600.0);
    }

    #[test]
    fn test_duration_hours_beyond_u64_range() {
        let cases = [
            ("PT99999999999999999999H", 99_999_999_999_999_999_999.0),
            ("PT18446744073709551616S", 18_446_744_073_709_551_616.0 / 3600.0),
        ];
        for (iso, expected) in cases {
            let actual = duration_hours(iso);
            assert!(
                ((actual - expected) / expected).abs() < 1e-12,
                "duration_hours({iso:?}) = {actual}, expected {expected}"
            );
        }
    }

    #[test]
    fn test_duration_hours_bare_prefix_is_zero() {
        assert_hours("PT", 0.0);
    }

    #[test]
    fn test_duration_hours_fallback() {
        for bad in ["", "30M", "P1D", "PT30", "PTM", "PT30M10H", "PT1.5H", "pt30m", "PT30MX", "PT1H1H"] {
            assert_hours(bad, DEFAULT_PERIOD_HOURS);
        }
    }

    #[test]
    fn test_normalize_timestamp_truncates_seven_digits() {
        assert_eq!(
            normalize_timestamp("2025-08-10T04:00:00.1234567Z"),
            "2025-08-10T04:00:00.123456+00:00"
        );
    }

    #[test]
    fn test_normalize_timestamp_pads_short_fraction() {
        assert_eq!(
            normalize_timestamp("2025-08-10T04:00:00.5-05:00"),
            "2025-08-10T04:00:00.500000-05:00"
        );
    }

    #[test]
    fn test_normalize_timestamp_fraction_without_offset_is_utc() {
        assert_eq!(
            normalize_timestamp("2025-08-10T04:00:00.25"),
            "2025-08-10T04:00:00.250000+00:00"
        );
    }

    #[test]
    fn test_normalize_timestamp_without_fraction() {
        assert_eq!(
            normalize_timestamp("2025-08-10T04:00:00Z"),
            "2025-08-10T04:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_solcast_timestamp() {
        let parsed = parse_period_end("2025-08-10T04:00:00.0000000Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 8, 10, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_z_matches_explicit_utc_offset() {
        for (z, offset) in [
            ("2025-08-10T04:30:00Z", "2025-08-10T04:30:00+00:00"),
            ("2025-12-31T23:59:59.9999999Z", "2025-12-31T23:59:59.9999999+00:00"),
        ] {
            assert_eq!(parse_period_end(z).unwrap(), parse_period_end(offset).unwrap());
        }
    }

    #[test]
    fn test_parse_truncates_without_changing_second() {
        let parsed = parse_period_end("2025-08-10T04:00:59.9999999Z").unwrap();

        assert_eq!(parsed.second(), 59);
        assert_eq!(parsed.nanosecond(), 999_999_000);
    }

    #[test]
    fn test_parse_respects_offset() {
        let parsed = parse_period_end("2025-08-10T04:00:00-05:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 8, 10, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_timestamp_as_utc() {
        let parsed = parse_period_end("2025-08-10T04:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2025, 8, 10, 4, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_invalid_timestamp() {
        let err = parse_period_end("yesterday-ish").unwrap_err();
        assert_eq!(err, TimestampError("yesterday-ish".to_string()));
        assert!(err.to_string().contains("yesterday-ish"));
    }
}
