//! `test-utils` is used for testing in both `zeit-lib` and `zeit-bin`.
//! This crate does not depend on `zeit-lib` or `zeit-bin`, else we would get dependency cycles.
//! Macros are used instead, so that the importer is responsible for providing the dependencies.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Create a mock API server with a single route, which answers requests
/// with the given method and path using `$template`.
///
/// The route expects to be called at least once.
#[macro_export]
macro_rules! mock_api {
    ($method:expr, $path:expr, $template:expr $(,)?) => {{
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method($method))
            .and(wiremock::matchers::path($path))
            .respond_with($template)
            .expect(1..)
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// Create a mock API server which rejects the first request to `$path`
/// with `429 Too Many Requests` and the given quota, then answers with
/// `$template`.
#[macro_export]
macro_rules! rate_limited_mock_api {
    ($path:expr, ($total:expr, $remaining:expr, $reset:expr), $template:expr $(,)?) => {{
        let mock_server = wiremock::MockServer::start().await;
        let rejection = serde_json::json!({
            "error": {
                "code": "rate_limited",
                "message": "Rate limit exceeded",
                "limit": { "total": $total, "remaining": $remaining, "reset": $reset }
            }
        });
        wiremock::Mock::given(wiremock::matchers::path($path))
            .respond_with(wiremock::ResponseTemplate::new(429).set_body_json(rejection))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;
        wiremock::Mock::given(wiremock::matchers::path($path))
            .respond_with($template)
            .expect(1)
            .mount(&mock_server)
            .await;
        mock_server
    }};
}

/// Unix timestamp in seconds, `offset` from now.
///
/// Rounded up, so the timestamp is never earlier than `now + offset`.
#[must_use]
pub fn epoch_secs_from_now(offset: Duration) -> u64 {
    let target = SystemTime::now() + offset;
    let since_epoch = target.duration_since(UNIX_EPOCH).unwrap_or_default();
    since_epoch.as_secs() + u64::from(since_epoch.subsec_nanos() > 0)
}
