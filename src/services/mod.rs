//! Service layer for the availability service.
//!
//! This module contains the business logic for:
//! - Feed retrieval (`FeedSource`, `HttpFeedSource`)
//! - iCalendar event extraction (`calendar::parse_events`)
//! - Blocked date resolution (`AvailabilityResolver`)

mod availability;
pub mod calendar;
mod feed;

pub use availability::{AvailabilityResolver, expand_events};
pub use feed::{FeedSource, HttpFeedSource};
