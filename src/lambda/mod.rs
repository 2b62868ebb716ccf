// src/lambda/mod.rs

//! AWS Lambda handler for availability lookups.
//!
//! The function receives a room identifier and returns that room's blocked
//! dates, the same answer the booking site requests when it opens its date
//! picker.

use std::sync::Arc;

use chrono::NaiveDate;
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::models::Config;
use crate::services::{AvailabilityResolver, FeedSource};

/// Lambda invocation payload.
#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    /// Room identifier to look up
    pub room: String,
}

/// Lambda response payload.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    /// Room identifier that was looked up
    pub room: String,

    /// Blocked dates in feed order (`YYYY-MM-DD`)
    pub blocked_dates: Vec<NaiveDate>,

    /// Number of blocked dates
    pub count: usize,
}

/// Main Lambda handler function.
///
/// Never fails for feed problems: those come back as an empty date list.
#[instrument(skip(resolver, event))]
pub async fn handler<S: FeedSource>(
    resolver: Arc<AvailabilityResolver<S>>,
    event: LambdaEvent<AvailabilityRequest>,
) -> std::result::Result<AvailabilityResponse, LambdaError> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    let room = request.room.trim().to_string();
    let blocked_dates = resolver.blocked_dates(&room).await;

    info!(
        "Resolved {} blocked dates for room {} in {}ms",
        blocked_dates.len(),
        room,
        start.elapsed().as_millis()
    );

    Ok(AvailabilityResponse {
        count: blocked_dates.len(),
        room,
        blocked_dates,
    })
}

/// Load configuration suitable for the Lambda environment.
///
/// Reads `CONFIG_PATH` when set, then applies environment overrides.
pub fn load_lambda_config() -> Result<Config> {
    let mut config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::load(&path)?,
        Err(_) => Config::default(),
    };
    config.apply_env_overrides(std::env::vars());
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parses_room() {
        let json = r#"{"room": "stanza1"}"#;
        let req: AvailabilityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.room, "stanza1");
    }

    #[test]
    fn test_request_requires_room() {
        assert!(serde_json::from_str::<AvailabilityRequest>("{}").is_err());
    }

    #[test]
    fn test_response_serializes_iso_dates() {
        let response = AvailabilityResponse {
            room: "stanza1".to_string(),
            blocked_dates: vec![
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            ],
            count: 2,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "room": "stanza1",
                "blocked_dates": ["2024-03-01", "2024-03-02"],
                "count": 2
            })
        );
    }
}
