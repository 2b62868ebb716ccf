//! Calendar event data structures.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// A DTSTART/DTEND value as found in a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),

    /// Date-time in UTC (trailing `Z`)
    Utc(DateTime<Utc>),

    /// Local date-time in a named zone (`TZID=...`)
    Zoned { local: NaiveDateTime, zone: Tz },

    /// Date-time without zone information
    Floating(NaiveDateTime),
}

impl EventTime {
    /// Calendar date of this value as seen from `tz`.
    ///
    /// All-day and floating values carry their own date and ignore `tz`.
    pub fn date_in(&self, tz: Tz) -> NaiveDate {
        match *self {
            EventTime::Date(date) => date,
            EventTime::Utc(instant) => instant.with_timezone(&tz).date_naive(),
            EventTime::Zoned { local, zone } => {
                resolve_local(zone, local).with_timezone(&tz).date_naive()
            }
            EventTime::Floating(local) => local.date(),
        }
    }

    /// Shift this value by `delta`, keeping its kind where possible.
    ///
    /// A date shifted by a non-whole number of days becomes floating.
    pub fn checked_add(&self, delta: TimeDelta) -> Option<EventTime> {
        match *self {
            EventTime::Date(date) if delta.num_seconds() % 86_400 == 0 => {
                date.checked_add_signed(delta).map(EventTime::Date)
            }
            EventTime::Date(date) => date
                .and_hms_opt(0, 0, 0)
                .and_then(|midnight| midnight.checked_add_signed(delta))
                .map(EventTime::Floating),
            EventTime::Utc(instant) => instant.checked_add_signed(delta).map(EventTime::Utc),
            EventTime::Zoned { local, zone } => local
                .checked_add_signed(delta)
                .map(|local| EventTime::Zoned { local, zone }),
            EventTime::Floating(local) => local.checked_add_signed(delta).map(EventTime::Floating),
        }
    }
}

/// Map a wall-clock time in `zone` to an instant.
///
/// Ambiguous times take the earlier instant; times inside a DST gap are
/// pushed forward past the gap.
fn resolve_local(zone: Tz, local: NaiveDateTime) -> DateTime<Tz> {
    zone.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            local
                .checked_add_signed(TimeDelta::hours(1))
                .and_then(|shifted| zone.from_local_datetime(&shifted).earliest())
        })
        .unwrap_or_else(|| zone.from_utc_datetime(&local))
}

/// One VEVENT reduced to what availability needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    /// DTSTART, if present
    pub start: Option<EventTime>,

    /// DTEND, or DTSTART + DURATION, if either is present
    pub end: Option<EventTime>,
}

impl Event {
    pub fn new(start: Option<EventTime>, end: Option<EventTime>) -> Self {
        Self { start, end }
    }

    /// Start and exclusive end dates in `tz`, or `None` if either bound is missing.
    pub fn date_range(&self, tz: Tz) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.start?.date_in(tz);
        let end = self.end?.date_in(tz);
        Some((start, end))
    }
}
