// src/lib.rs

//! Room availability library.
//!
//! Resolves the dates a room is blocked by reading the room's hosted
//! iCalendar feed. See [`services::AvailabilityResolver`].

#[cfg(feature = "lambda")]
pub mod lambda;

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{AppError, Result};
pub use models::{Config, FeedRegistry};
pub use services::{AvailabilityResolver, FeedSource, HttpFeedSource};
