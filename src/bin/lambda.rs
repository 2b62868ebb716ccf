//! AWS Lambda entry point for the availability service
//!
//! Deploy with `cargo lambda build --release --features lambda`
//! Invoke with `{ "room": "stanza1" }`.

use std::sync::Arc;

use availability::AvailabilityResolver;
use availability::lambda::{AvailabilityRequest, handler, load_lambda_config};
use lambda_runtime::{Error as LambdaError, LambdaEvent, service_fn};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the AWS Lambda function.
#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = load_lambda_config()?;
    let resolver = Arc::new(AvailabilityResolver::from_config(&config)?);
    info!(
        "Availability Lambda starting with {} rooms in {}",
        resolver.registry().len(),
        resolver.time_zone()
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<AvailabilityRequest>| {
        let resolver = Arc::clone(&resolver);
        async move { handler(resolver, event).await }
    }))
    .await
}
