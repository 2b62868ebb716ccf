//! End-to-end availability lookups against a mock feed host.

use std::net::TcpListener;
use std::time::{Duration, Instant};

use availability::models::{Config, HttpConfig};
use availability::{AvailabilityResolver, FeedRegistry, FeedSource, HttpFeedSource};
use chrono::NaiveDate;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

const FEED: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Booking//Export//EN\r\n\
BEGIN:VEVENT\r\n\
UID:res-1\r\n\
DTSTART;VALUE=DATE:20240301\r\n\
DTEND;VALUE=DATE:20240304\r\n\
SUMMARY:CLOSED - Not available\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:res-2\r\n\
DTSTART;VALUE=DATE:20240310\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn http_config(timeout_secs: u64, max_concurrent: usize) -> HttpConfig {
    HttpConfig {
        timeout_secs,
        max_concurrent,
        ..HttpConfig::default()
    }
}

fn resolver_for(url: &str, http: HttpConfig) -> AvailabilityResolver {
    let mut config = Config::default();
    config.http = http;
    config.rooms.insert("stanza1".to_string(), url.to_string());
    AvailabilityResolver::from_config(&config).unwrap()
}

async fn serve(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(matchers::method("GET"))
        .and(matchers::path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_blocked_dates_from_served_feed() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/stanza1.ics",
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/calendar; charset=utf-8")
            .set_body_string(FEED),
    )
    .await;

    let resolver = resolver_for(&format!("{}/stanza1.ics", server.uri()), HttpConfig::default());

    assert_eq!(
        resolver.blocked_dates("stanza1").await,
        vec![date(2024, 3, 1), date(2024, 3, 2), date(2024, 3, 3)]
    );
}

#[tokio::test]
async fn test_feed_is_fetched_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/stanza1.ics"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver_for(&format!("{}/stanza1.ics", server.uri()), HttpConfig::default());
    resolver.blocked_dates("stanza1").await;
    resolver.blocked_dates("stanza1").await;

    // wiremock verifies the expected call count when the server drops
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::header("user-agent", "availability-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .expect(1)
        .mount(&server)
        .await;

    let http = HttpConfig {
        user_agent: "availability-test/1.0".to_string(),
        ..HttpConfig::default()
    };
    let resolver = resolver_for(&format!("{}/feed.ics", server.uri()), http);
    assert_eq!(resolver.blocked_dates("stanza1").await.len(), 3);
}

#[tokio::test]
async fn test_error_status_yields_empty_list() {
    let server = MockServer::start().await;
    serve(&server, "/missing.ics", ResponseTemplate::new(404).set_body_string(FEED)).await;
    serve(&server, "/broken.ics", ResponseTemplate::new(500)).await;

    let missing = resolver_for(&format!("{}/missing.ics", server.uri()), HttpConfig::default());
    assert!(missing.blocked_dates("stanza1").await.is_empty());

    let broken = resolver_for(&format!("{}/broken.ics", server.uri()), HttpConfig::default());
    assert!(broken.blocked_dates("stanza1").await.is_empty());
}

#[tokio::test]
async fn test_html_body_yields_empty_list() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/login",
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html")
            .set_body_string("<!DOCTYPE html>\n<html><body>Please sign in</body></html>\n"),
    )
    .await;

    let resolver = resolver_for(&format!("{}/login", server.uri()), HttpConfig::default());
    assert!(resolver.blocked_dates("stanza1").await.is_empty());
}

#[tokio::test]
async fn test_slow_feed_times_out_to_empty_list() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/slow.ics",
        ResponseTemplate::new(200)
            .set_body_string(FEED)
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let resolver = resolver_for(&format!("{}/slow.ics", server.uri()), http_config(1, 4));

    let started = Instant::now();
    assert!(resolver.blocked_dates("stanza1").await.is_empty());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_unreachable_host_yields_empty_list() {
    // Grab a free port, then close it so nothing is listening there.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let resolver = resolver_for(&format!("http://127.0.0.1:{port}/feed.ics"), http_config(2, 4));
    assert!(resolver.blocked_dates("stanza1").await.is_empty());
}

#[tokio::test]
async fn test_concurrent_fetches_are_bounded() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/feed.ics",
        ResponseTemplate::new(200)
            .set_body_string(FEED)
            .set_delay(Duration::from_millis(300)),
    )
    .await;

    let source = HttpFeedSource::new(&http_config(10, 1)).unwrap();
    let url = format!("{}/feed.ics", server.uri());

    let started = Instant::now();
    let (a, b) = tokio::join!(source.fetch(&url), source.fetch(&url));
    assert!(a.is_ok());
    assert!(b.is_ok());
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_registry_and_source_wired_by_hand() {
    let server = MockServer::start().await;
    serve(&server, "/a.ics", ResponseTemplate::new(200).set_body_string(FEED)).await;

    let registry = FeedRegistry::new([
        ("stanza1", format!("{}/a.ics", server.uri())),
        ("stanza2", String::new()),
    ]);
    let source = HttpFeedSource::new(&HttpConfig::default()).unwrap();
    let resolver = AvailabilityResolver::new(registry, source, chrono_tz::Europe::Rome);

    assert_eq!(resolver.blocked_dates("stanza1").await.len(), 3);
    assert!(resolver.blocked_dates("stanza2").await.is_empty());
    assert!(resolver.blocked_dates("stanza3").await.is_empty());
}
