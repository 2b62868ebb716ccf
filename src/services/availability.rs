// src/services/availability.rs

//! Availability resolver.
//!
//! Answers "which dates is this room blocked on" by reading the room's
//! calendar feed. Feed problems never reach the caller: an unreadable feed
//! is reported as a room with no blocked dates and logged instead.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::error::Result;
use crate::models::{Config, Event, FeedRegistry};
use crate::services::calendar::parse_events;
use crate::services::feed::{FeedSource, HttpFeedSource};
use crate::utils::time::days_between;

/// Resolves blocked dates for rooms from their calendar feeds.
pub struct AvailabilityResolver<S = HttpFeedSource> {
    registry: FeedRegistry,
    source: S,
    time_zone: Tz,
}

impl AvailabilityResolver<HttpFeedSource> {
    /// Build a resolver with an HTTP feed source from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HttpFeedSource::new(&config.http)?;
        Ok(Self::new(
            FeedRegistry::from_config(config),
            source,
            config.time_zone()?,
        ))
    }
}

impl<S: FeedSource> AvailabilityResolver<S> {
    /// Create a resolver.
    ///
    /// `time_zone` is used to turn event instants into calendar dates.
    pub fn new(registry: FeedRegistry, source: S, time_zone: Tz) -> Self {
        Self {
            registry,
            source,
            time_zone,
        }
    }

    pub fn registry(&self) -> &FeedRegistry {
        &self.registry
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Dates on which `room_id` is blocked.
    ///
    /// Dates come in feed event order, each event contributing its days from
    /// start up to (not including) its end. Overlapping events produce
    /// repeated dates. Unknown rooms, rooms without a feed URL and feeds that
    /// cannot be fetched or parsed all yield an empty list.
    pub async fn blocked_dates(&self, room_id: &str) -> Vec<NaiveDate> {
        let Some(url) = self.registry.feed_url(room_id) else {
            log::debug!("No calendar feed configured for room {}", room_id);
            return Vec::new();
        };

        log::info!("Fetching calendar feed for room {} from {}", room_id, url);
        match self.try_blocked_dates(url).await {
            Ok(dates) => {
                log::info!("Found {} blocked dates for room {}", dates.len(), room_id);
                dates
            }
            Err(e) => {
                log::error!(
                    "Error fetching or parsing calendar feed for room {} ({}): {}",
                    room_id,
                    url,
                    e
                );
                log::debug!("Feed failure detail for room {}: {:?}", room_id, e);
                Vec::new()
            }
        }
    }

    /// Fetch, parse and expand the feed at `url`.
    ///
    /// This is the fallible core of [`Self::blocked_dates`].
    pub async fn try_blocked_dates(&self, url: &str) -> Result<Vec<NaiveDate>> {
        let body = self.source.fetch(url).await?;
        let events = parse_events(&body)?;
        log::debug!("Parsed {} events from {}", events.len(), url);
        Ok(expand_events(&events, self.time_zone))
    }
}

/// Flatten events into their blocked dates.
///
/// Events missing a start or an end are skipped; empty and inverted ranges
/// contribute nothing.
pub fn expand_events(events: &[Event], time_zone: Tz) -> Vec<NaiveDate> {
    events
        .iter()
        .filter_map(|event| event.date_range(time_zone))
        .flat_map(|(start, end)| days_between(start, end))
        .collect()
}
