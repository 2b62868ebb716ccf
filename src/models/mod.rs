// src/models/mod.rs

//! Domain models for the availability service.
//!
//! Configuration, the room feed registry and calendar events.

mod config;
mod event;
mod registry;

// Re-export all public types
pub use config::{Config, HttpConfig, LoggingConfig};
pub use event::{Event, EventTime};
pub use registry::FeedRegistry;
