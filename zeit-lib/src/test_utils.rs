use serde_json::{Value, json};
use wiremock::MockServer;

use crate::{Client, ClientBuilder};

/// Create a client which sends its requests to `mock_server`
///
/// # Panic
///
/// This panics if the client cannot be built, so it should only be used for
/// testing
pub(crate) fn client_for(mock_server: &MockServer, token: &str) -> Client {
    ClientBuilder::builder()
        .token(token)
        .base_url(mock_server.uri())
        .build()
        .client()
        .expect("Expected a valid client")
}

/// Body of a `429 Too Many Requests` response with the given quota
pub(crate) fn rejection_body(total: u64, remaining: u64, reset: u64) -> Value {
    json!({
        "error": {
            "code": "rate_limited",
            "message": "Rate limit exceeded",
            "limit": { "total": total, "remaining": remaining, "reset": reset }
        }
    })
}
