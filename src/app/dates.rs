//! Date/time text recognition and conversion
//!
//! Date values are held as `f64` seconds relative to [`DATE_EPOCH`] so they
//! can be stored next to numeric data; unparseable text becomes NaN.
//!
//! Accepted forms are ISO-like dates with an optional time part
//! (`2023-01-31`, `2023-01-31T09:30`, `2023-01-31T09:30:15.25Z`) and bare
//! times of day (`09:30:15`), the latter being measured from midnight of the
//! epoch day.

use crate::constants::{DATE_DISPLAY_FORMAT, DATE_EPOCH};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{1,2})(?::(\d{1,2})(\.\d*)?)?)?Z?$",
    )
    .expect("date pattern is valid")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2})(\.\d*)?)?$").expect("time pattern is valid")
});

static EPOCH: LazyLock<NaiveDateTime> = LazyLock::new(|| {
    NaiveDateTime::parse_from_str(DATE_EPOCH, DATE_DISPLAY_FORMAT).expect("epoch is valid")
});

/// Whether the text looks like a date or time of day
pub fn is_date_time(text: &str) -> bool {
    DATE_RE.is_match(text) || TIME_RE.is_match(text)
}

/// Convert date text to seconds relative to the epoch, NaN when invalid
pub fn date_string_to_date(text: &str) -> f64 {
    parse_date_time(text)
        .map(|dt| seconds_since_epoch(&dt))
        .unwrap_or(f64::NAN)
}

/// Render seconds relative to the epoch back to ISO text
pub fn date_to_string(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1e6).round() as i64;
    let dt = EPOCH.checked_add_signed(Duration::microseconds(micros))?;
    Some(dt.format(DATE_DISPLAY_FORMAT).to_string())
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Some(caps) = DATE_RE.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        let time = match caps.get(4) {
            Some(hour) => time_of_day(
                hour.as_str(),
                &caps[5],
                caps.get(6).map(|m| m.as_str()),
                caps.get(7).map(|m| m.as_str()),
            )?,
            None => NaiveTime::from_hms_opt(0, 0, 0)?,
        };
        return Some(date.and_time(time));
    }

    let caps = TIME_RE.captures(text)?;
    let time = time_of_day(
        &caps[1],
        &caps[2],
        caps.get(3).map(|m| m.as_str()),
        caps.get(4).map(|m| m.as_str()),
    )?;
    Some(EPOCH.date().and_time(time))
}

fn time_of_day(
    hour: &str,
    minute: &str,
    second: Option<&str>,
    fraction: Option<&str>,
) -> Option<NaiveTime> {
    let hour = hour.parse().ok()?;
    let minute = minute.parse().ok()?;
    let second = second.map_or(Some(0), |s| s.parse().ok())?;
    // fraction includes the leading '.', and may be just "."
    let micros = match fraction {
        Some(f) if f.len() > 1 => (format!("0{}", f).parse::<f64>().ok()? * 1e6).round() as u32,
        _ => 0,
    };
    NaiveTime::from_hms_micro_opt(hour, minute, second, micros)
}

fn seconds_since_epoch(dt: &NaiveDateTime) -> f64 {
    let delta = dt.signed_duration_since(*EPOCH);
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_date_time() {
        assert!(is_date_time("2023-01-31"));
        assert!(is_date_time("2023-1-5T09:30"));
        assert!(is_date_time("2023-01-31T09:30:15.25"));
        assert!(is_date_time("2023-01-31T09:30:15Z"));
        assert!(is_date_time("09:30:15"));
        assert!(!is_date_time("hello"));
        assert!(!is_date_time("1.5"));
        assert!(!is_date_time("2023/01/31"));
    }

    #[test]
    fn test_epoch_is_zero() {
        assert_eq!(date_string_to_date("2009-01-01"), 0.0);
        assert_eq!(date_string_to_date("2009-01-02"), 86400.0);
        assert_eq!(date_string_to_date("2009-01-01T01:00:30.5"), 3630.5);
        assert_eq!(date_string_to_date("2008-12-31T23:59:00"), -60.0);
    }

    #[test]
    fn test_time_of_day_only() {
        assert_eq!(date_string_to_date("12:00"), 43200.0);
        assert_eq!(date_string_to_date("00:00:01"), 1.0);
    }

    #[test]
    fn test_invalid_dates_are_nan() {
        assert!(date_string_to_date("2023-02-30").is_nan());
        assert!(date_string_to_date("25:00:00").is_nan());
        assert!(date_string_to_date("rubbish").is_nan());
    }

    #[test]
    fn test_date_to_string() {
        assert_eq!(
            date_to_string(86400.0 + 3600.0).as_deref(),
            Some("2009-01-02T01:00:00")
        );
        assert_eq!(date_to_string(f64::NAN), None);
    }
}
