use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use super::headers::from_epoch_secs;
use crate::{ErrorKind, Result};

/// The quota reported by the API when it rejects a request with
/// `429 Too Many Requests`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitQuota {
    /// Maximum number of requests per window
    pub total: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// End of the current window in epoch seconds
    pub reset: u64,
}

/// Error payload of a rate-limit rejection.
///
/// ```json
/// {"error": {"code": "rate_limited", "message": "...",
///            "limit": {"total": 5, "remaining": 0, "reset": 1571432374}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRejection {
    /// Machine readable error code, e.g. `rate_limited`
    #[serde(default)]
    pub code: String,
    /// Human readable error message
    #[serde(default)]
    pub message: String,
    /// The server's view of the rate limit window
    pub limit: RateLimitQuota,
}

#[derive(Deserialize)]
struct RejectionBody {
    error: RateLimitRejection,
}

impl RateLimitRejection {
    /// Decode a rejection from a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::RateLimitPayload`] if the body is not a rejection
    /// payload. Without a known reset time there is no safe way to continue,
    /// so unlike malformed headers this is a hard failure.
    /// Negative counts or timestamps are rejected the same way.
    ///
    /// Returns [`ErrorKind::RateLimitReset`] if the reset cannot be
    /// represented as a [`SystemTime`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let rejection = serde_json::from_slice::<RejectionBody>(body)
            .map(|body| body.error)
            .map_err(ErrorKind::RateLimitPayload)?;
        rejection.reset_at()?;
        Ok(rejection)
    }

    /// The point in time at which the window resets
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::RateLimitReset`] if `limit.reset` lies beyond
    /// what [`SystemTime`] can hold.
    pub fn reset_at(&self) -> Result<SystemTime> {
        from_epoch_secs(self.limit.reset).ok_or(ErrorKind::RateLimitReset(self.limit.reset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_decode_rejection() {
        let body = br#"{"error":{"code":"rate_limited","message":"Rate limit exceeded","limit":{"total":5,"remaining":0,"reset":1571432374}}}"#;
        let rejection = RateLimitRejection::from_slice(body).unwrap();
        assert_eq!(rejection.code, "rate_limited");
        assert_eq!(
            rejection.limit,
            RateLimitQuota {
                total: 5,
                remaining: 0,
                reset: 1_571_432_374,
            }
        );
        assert_eq!(
            rejection.reset_at().unwrap(),
            UNIX_EPOCH + Duration::from_secs(1_571_432_374)
        );
    }

    #[test]
    fn test_missing_message_is_fine() {
        let body = br#"{"error":{"limit":{"total":1,"remaining":0,"reset":10}}}"#;
        let rejection = RateLimitRejection::from_slice(body).unwrap();
        assert!(rejection.code.is_empty());
        assert_eq!(rejection.limit.total, 1);
    }

    #[test]
    fn test_missing_limit_is_an_error() {
        let body = br#"{"error":{"code":"rate_limited","message":"slow down"}}"#;
        assert!(matches!(
            RateLimitRejection::from_slice(body),
            Err(ErrorKind::RateLimitPayload(_))
        ));
    }

    #[test]
    fn test_negative_remaining_is_an_error() {
        let body = br#"{"error":{"limit":{"total":5,"remaining":-1,"reset":10}}}"#;
        assert!(RateLimitRejection::from_slice(body).is_err());
    }

    #[test]
    fn test_unrepresentable_reset_is_an_error() {
        let body = br#"{"error":{"limit":{"total":5,"remaining":0,"reset":18446744073709551615}}}"#;
        assert_eq!(
            RateLimitRejection::from_slice(body).unwrap_err(),
            ErrorKind::RateLimitReset(u64::MAX)
        );

        let rejection = RateLimitRejection {
            code: String::new(),
            message: String::new(),
            limit: RateLimitQuota {
                total: 5,
                remaining: 0,
                reset: u64::MAX,
            },
        };
        assert!(rejection.reset_at().is_err());
    }

    #[test]
    fn test_not_json_is_an_error() {
        assert!(RateLimitRejection::from_slice(b"Too Many Requests").is_err());
    }
}
