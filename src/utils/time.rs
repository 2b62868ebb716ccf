// src/utils/time.rs

//! iCalendar date and duration values.
//!
//! Parses the DATE, DATE-TIME and DURATION value types of RFC 5545 and walks
//! date ranges one day at a time.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::EventTime;

const DATE_FORMAT: &str = "%Y%m%d";
const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-])?P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("DURATION pattern is valid")
});

/// Parse a DTSTART/DTEND value.
///
/// `value_type` is the `VALUE` parameter and `tzid` the `TZID` parameter,
/// if present. A `TZID` that is not a known IANA zone leaves the value
/// floating.
pub fn parse_event_time(
    property: &str,
    value: &str,
    value_type: Option<&str>,
    tzid: Option<&str>,
) -> Result<EventTime> {
    let raw = value.trim();
    let invalid = || AppError::invalid_value(property, value);

    let is_date = match value_type {
        Some(kind) => kind.eq_ignore_ascii_case("DATE"),
        None => raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()),
    };
    if is_date {
        return NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(EventTime::Date)
            .map_err(|_| invalid());
    }

    if let Some(utc) = raw.strip_suffix(['Z', 'z']) {
        let local = NaiveDateTime::parse_from_str(utc, DATE_TIME_FORMAT).map_err(|_| invalid())?;
        return Ok(EventTime::Utc(Utc.from_utc_datetime(&local)));
    }

    let local = NaiveDateTime::parse_from_str(raw, DATE_TIME_FORMAT).map_err(|_| invalid())?;
    match tzid.and_then(parse_tzid) {
        Some(zone) => Ok(EventTime::Zoned { local, zone }),
        None => Ok(EventTime::Floating(local)),
    }
}

/// Look up a `TZID` parameter as an IANA zone.
///
/// Accepts quoted values and the `/`-prefixed global form.
pub fn parse_tzid(tzid: &str) -> Option<Tz> {
    tzid.trim()
        .trim_matches('"')
        .trim_start_matches('/')
        .parse()
        .ok()
}

/// Parse a DURATION value such as `P1D`, `PT2H30M` or `-P1W`.
pub fn parse_duration(value: &str) -> Result<TimeDelta> {
    let invalid = || AppError::invalid_value("DURATION", value);
    let raw = value.trim();
    let caps = DURATION_PATTERN.captures(raw).ok_or_else(invalid)?;

    const UNITS: [(usize, i64); 5] = [(2, 604_800), (3, 86_400), (4, 3_600), (5, 60), (6, 1)];
    let mut seconds: i64 = 0;
    let mut any = false;
    for (group, unit) in UNITS {
        if let Some(m) = caps.get(group) {
            any = true;
            let amount: i64 = m.as_str().parse().map_err(|_| invalid())?;
            seconds = amount
                .checked_mul(unit)
                .and_then(|part| seconds.checked_add(part))
                .ok_or_else(invalid)?;
        }
    }
    if !any || raw.ends_with('T') {
        return Err(invalid());
    }
    if caps.get(1).is_some_and(|sign| sign.as_str() == "-") {
        seconds = -seconds;
    }

    TimeDelta::try_seconds(seconds).ok_or_else(invalid)
}

/// Dates from `start` (inclusive) to `end` (exclusive).
///
/// Yields nothing when `start` is not before `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day < end)
}
