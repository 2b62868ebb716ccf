// src/utils/url.rs

//! Feed URL utilities.

use url::Url;

use crate::error::{AppError, Result};

/// Parse a configured feed URL into something an HTTP client can fetch.
///
/// `webcal://` is the calendar-subscription alias of `https://`; only
/// HTTP(S) URLs are accepted otherwise.
///
/// # Examples
/// ```
/// use availability::utils::url::normalize_feed_url;
///
/// assert_eq!(
///     normalize_feed_url("webcal://example.com/room.ics").unwrap().as_str(),
///     "https://example.com/room.ics"
/// );
/// ```
pub fn normalize_feed_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let rewritten = match raw.get(..9) {
        Some(scheme) if scheme.eq_ignore_ascii_case("webcal://") => {
            format!("https://{}", &raw[9..])
        }
        _ => raw.to_string(),
    };

    let url = Url::parse(&rewritten)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::fetch(
            raw,
            format!("unsupported URL scheme '{other}'"),
        )),
    }
}
