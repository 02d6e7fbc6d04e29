use http::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::ApiError;

/// Possible Errors when interacting with `zeit_lib`
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Network error while sending a request.
    /// These are returned to the caller as-is and never retried.
    #[error("Network error while trying to connect to the API")]
    NetworkRequest(#[source] reqwest::Error),

    /// The body of a response could not be read
    #[error("Error reading response body: {0}")]
    ReadResponseBody(#[source] reqwest::Error),

    /// The request client cannot be created
    #[error("Error creating request client: {0}")]
    BuildRequestClient(#[source] reqwest::Error),

    /// The given header could not be parsed.
    /// A possible error when converting a `HeaderValue` from a string or byte
    /// slice.
    #[error("Header could not be parsed.")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// The base URL and the endpoint path do not form a valid URL
    #[error("Cannot parse '{0}' as URL: {1}")]
    InvalidUrl(String, #[source] url::ParseError),

    /// A `429 Too Many Requests` response did not carry a rate limit payload
    #[error("Cannot decode rate limit rejection: {0}")]
    RateLimitPayload(#[source] serde_json::Error),

    /// A `429 Too Many Requests` response announced a reset which is not a
    /// representable point in time
    #[error("Rate limit reset {0} is not a valid Unix timestamp")]
    RateLimitReset(u64),

    /// Waiting for the rate limit to reset would exceed the configured budget
    #[error(
        "Rate limit resets in {}s which exceeds the wait budget of {}s",
        wait.as_secs(),
        budget.as_secs()
    )]
    RateLimitTimeout {
        /// Time until the rate limit resets
        wait: Duration,
        /// Total time a single request may spend waiting
        budget: Duration,
    },

    /// The request body could not be encoded as JSON
    #[error("Cannot encode request body: {0}")]
    SerializeBody(#[source] serde_json::Error),

    /// A successful response did not have the expected shape
    #[error("Cannot decode response body: {0}")]
    DecodeResponse(#[source] serde_json::Error),

    /// The API answered with an error status and described the error
    #[error("API responded with {status}: {error}")]
    Api {
        /// Status code of the response
        status: StatusCode,
        /// Error payload of the response
        error: ApiError,
    },

    /// The API answered with an error status without a readable error payload
    #[error("API responded with unexpected status {0}")]
    UnexpectedStatus(StatusCode),

    /// The API does not use `@` for the zone origin
    #[error("ZEIT API does not use `@` to represent the origin, use an empty string instead")]
    OriginRecordName,
}

impl ErrorKind {
    /// Return the underlying `reqwest::Error`, if any
    #[must_use]
    pub const fn reqwest_error(&self) -> Option<&reqwest::Error> {
        match self {
            Self::NetworkRequest(e) | Self::ReadResponseBody(e) | Self::BuildRequestClient(e) => {
                Some(e)
            }
            _ => None,
        }
    }

    /// The status code of the failed response, if the API answered at all
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } | Self::UnexpectedStatus(status) => Some(*status),
            _ => None,
        }
    }

    /// The error payload returned by the API, if any
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl PartialEq for ErrorKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NetworkRequest(e1), Self::NetworkRequest(e2))
            | (Self::ReadResponseBody(e1), Self::ReadResponseBody(e2))
            | (Self::BuildRequestClient(e1), Self::BuildRequestClient(e2)) => {
                e1.to_string() == e2.to_string()
            }
            (Self::RateLimitPayload(e1), Self::RateLimitPayload(e2))
            | (Self::SerializeBody(e1), Self::SerializeBody(e2))
            | (Self::DecodeResponse(e1), Self::DecodeResponse(e2)) => {
                e1.to_string() == e2.to_string()
            }
            (Self::InvalidUrl(s1, e1), Self::InvalidUrl(s2, e2)) => s1 == s2 && e1 == e2,
            (
                Self::RateLimitTimeout {
                    wait: w1,
                    budget: b1,
                },
                Self::RateLimitTimeout {
                    wait: w2,
                    budget: b2,
                },
            ) => w1 == w2 && b1 == b2,
            (
                Self::Api {
                    status: s1,
                    error: e1,
                },
                Self::Api {
                    status: s2,
                    error: e2,
                },
            ) => s1 == s2 && e1 == e2,
            (Self::UnexpectedStatus(s1), Self::UnexpectedStatus(s2)) => s1 == s2,
            (Self::RateLimitReset(r1), Self::RateLimitReset(r2)) => r1 == r2,
            (Self::InvalidHeader(_), Self::InvalidHeader(_))
            | (Self::OriginRecordName, Self::OriginRecordName) => true,
            _ => false,
        }
    }
}

impl Eq for ErrorKind {}
