//! Room feed registry.

use std::collections::BTreeMap;

use crate::models::Config;

/// Read-only mapping from room identifier to calendar feed URL.
///
/// Built once at startup and shared by reference; there are no mutating
/// operations after construction.
#[derive(Debug, Clone, Default)]
pub struct FeedRegistry {
    feeds: BTreeMap<String, String>,
}

impl FeedRegistry {
    /// Build a registry from `(room, url)` pairs.
    pub fn new<I, K, V>(feeds: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            feeds: feeds
                .into_iter()
                .map(|(room, url)| (room.into(), url.into().trim().to_string()))
                .collect(),
        }
    }

    /// Build a registry from the `[rooms]` table of the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rooms.clone())
    }

    /// Feed URL for a room, or `None` when the room is unknown or its URL is blank.
    pub fn feed_url(&self, room_id: &str) -> Option<&str> {
        self.feeds
            .get(room_id)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// All registered rooms with their (possibly empty) feed URL.
    pub fn rooms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.feeds
            .iter()
            .map(|(room, url)| (room.as_str(), url.as_str()))
    }

    /// Number of registered rooms, configured or not.
    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    /// Whether no rooms are registered.
    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}
