//! Handle rate limiting headers.
//!
//! The API reports its window on every response through the common
//! "X-RateLimit" header fields. These are not standardised yet, but there is an
//! [IETF draft](https://datatracker.ietf.org/doc/draft-ietf-httpapi-ratelimit-headers/).
//! Header names are matched case-insensitively by [`http::HeaderMap`].

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const REMAINING_HEADERS: &[&str] = &[
    "x-ratelimit-remaining",
    "x-rate-limit-remaining",
    "ratelimit-remaining",
];

const LIMIT_HEADERS: &[&str] = &["x-ratelimit-limit", "x-rate-limit-limit", "ratelimit-limit"];

// The draft's `ratelimit-reset` carries delta seconds rather than an epoch
// timestamp, so it is not accepted here.
const RESET_HEADERS: &[&str] = &["x-ratelimit-reset", "x-rate-limit-reset"];

/// Rate limit fields found on a response.
///
/// A field is `None` if its header was missing or could not be parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// Requests left in the current window
    pub remaining: Option<u64>,
    /// Maximum number of requests per window
    pub limit: Option<u64>,
    /// End of the current window, sent as epoch seconds
    pub reset_at: Option<SystemTime>,
}

impl RateLimitHeaders {
    /// Parse the common "X-RateLimit" header fields.
    ///
    /// Malformed values are skipped, since an unparseable header must never
    /// fail an otherwise valid response.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            remaining: parse_header_value(headers, REMAINING_HEADERS),
            limit: parse_header_value(headers, LIMIT_HEADERS),
            reset_at: parse_header_value(headers, RESET_HEADERS).and_then(from_epoch_secs),
        }
    }

    /// Returns `true` if none of the rate limit headers were found
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining.is_none() && self.limit.is_none() && self.reset_at.is_none()
    }
}

/// Convert seconds since the Unix epoch to a [`SystemTime`]
pub(crate) fn from_epoch_secs(secs: u64) -> Option<SystemTime> {
    UNIX_EPOCH.checked_add(Duration::from_secs(secs))
}

/// Helper method to parse numeric header values from common rate limit headers
fn parse_header_value(headers: &HeaderMap, header_names: &[&str]) -> Option<u64> {
    for header_name in header_names {
        if let Some(value) = headers.get(*header_name)
            && let Ok(value_str) = value.to_str()
            && let Ok(number) = value_str.trim().parse::<u64>()
        {
            return Some(number);
        }
    }
    None
}
