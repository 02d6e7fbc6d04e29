//! Rate limit coordination for requests against the API.
//!
//! The API grants every token a fixed number of requests per window and
//! reports the window on each response. This module keeps track of that
//! window so the request gateway in [`crate::Client`] can hold back requests
//! which would be rejected anyway.
//!
//! # Architecture
//!
//! - [`RateLimitState`]: `limit`, `remaining` and `reset_at` as last reported
//! - [`RateLimit`]: a shareable, mutex-guarded [`RateLimitState`]
//! - [`RateLimitRegistry`]: one [`RateLimit`] per API token, for clients
//!   which should throttle together
//! - [`RateLimitHeaders`]: the rate limit fields of a response
//! - [`RateLimitRejection`]: the payload of a `429 Too Many Requests`

mod headers;
mod registry;
mod rejection;
mod state;

pub use headers::RateLimitHeaders;
pub use registry::RateLimitRegistry;
pub use rejection::{RateLimitQuota, RateLimitRejection};
pub use state::{RateLimit, RateLimitState};
