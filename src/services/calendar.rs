// src/services/calendar.rs

//! iCalendar feed parsing.
//!
//! Turns a feed body into the list of [`Event`]s it contains, in document
//! order. Only DTSTART, DTEND and DURATION of each VEVENT are read.

use ical::IcalParser;
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;

use crate::error::{AppError, Result};
use crate::models::{Event, EventTime};
use crate::utils::time::{parse_duration, parse_event_time};

/// Parse every VEVENT in `body`.
///
/// A body without a complete VCALENDAR object is an error, as is any
/// DTSTART/DTEND/DURATION value that cannot be read. Events lacking those
/// properties are kept with the bound left empty.
pub fn parse_events(body: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    let mut calendars = 0usize;

    for calendar in IcalParser::new(body.as_bytes()) {
        let calendar = calendar.map_err(AppError::parse)?;
        calendars += 1;
        for event in &calendar.events {
            events.push(convert_event(event)?);
        }
    }

    if calendars == 0 {
        return Err(AppError::parse("no complete VCALENDAR object in feed"));
    }
    Ok(events)
}

fn convert_event(event: &IcalEvent) -> Result<Event> {
    let start = find_property(event, "DTSTART")
        .map(|p| to_event_time("DTSTART", p))
        .transpose()?;
    let mut end = find_property(event, "DTEND")
        .map(|p| to_event_time("DTEND", p))
        .transpose()?;

    if end.is_none() {
        if let (Some(start), Some(duration)) = (start, find_property(event, "DURATION")) {
            let value = duration.value.as_deref().unwrap_or_default();
            let delta = parse_duration(value)?;
            end = Some(
                start
                    .checked_add(delta)
                    .ok_or_else(|| AppError::invalid_value("DURATION", value))?,
            );
        }
    }

    Ok(Event::new(start, end))
}

/// First property named `name` that carries a non-empty value.
fn find_property<'a>(event: &'a IcalEvent, name: &str) -> Option<&'a Property> {
    event.properties.iter().find(|p| {
        p.name.eq_ignore_ascii_case(name)
            && p.value.as_deref().is_some_and(|v| !v.trim().is_empty())
    })
}

fn param<'a>(property: &'a Property, name: &str) -> Option<&'a str> {
    property
        .params
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, values)| values.first())
        .map(String::as_str)
}

fn to_event_time(name: &str, property: &Property) -> Result<EventTime> {
    let value = property.value.as_deref().unwrap_or_default();
    parse_event_time(name, value, param(property, "VALUE"), param(property, "TZID"))
}
