use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use super::headers::RateLimitHeaders;

/// The rate-limit window of the API, as last reported by the server.
///
/// The server is the source of truth for these values. Locally the only
/// bookkeeping is the optimistic decrement in [`RateLimitState::consume`],
/// which is corrected by the headers of the very same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Maximum number of requests per window
    pub limit: u64,
    /// Requests left in the current window
    pub remaining: u64,
    /// Point in time at which `remaining` is reset to `limit`
    pub reset_at: SystemTime,
}

impl RateLimitState {
    /// A permissive state which lets the first request pass:
    /// one request allowed, one remaining, window resetting at `now`.
    #[must_use]
    pub const fn permissive(now: SystemTime) -> Self {
        Self {
            limit: 1,
            remaining: 1,
            reset_at: now,
        }
    }

    /// How long a request issued at `now` has to wait.
    ///
    /// Returns `None` if there is capacity left or if the window has already
    /// been reset, regardless of the remaining count.
    #[must_use]
    pub fn wait_time(&self, now: SystemTime) -> Option<Duration> {
        if self.remaining > 0 {
            return None;
        }
        // `duration_since` fails if `reset_at` lies in the past
        match self.reset_at.duration_since(now) {
            Ok(wait) if !wait.is_zero() => Some(wait),
            _ => None,
        }
    }

    /// Overwrite the fields for which a header was present.
    pub fn apply_headers(&mut self, headers: &RateLimitHeaders) {
        if let Some(remaining) = headers.remaining {
            self.remaining = remaining;
        }
        if let Some(limit) = headers.limit {
            self.limit = limit;
        }
        if let Some(reset_at) = headers.reset_at {
            self.reset_at = reset_at;
        }
    }

    /// Overwrite all fields with the values of a rate-limit rejection.
    pub fn apply_rejection(&mut self, limit: u64, remaining: u64, reset_at: SystemTime) {
        self.limit = limit;
        self.remaining = remaining;
        self.reset_at = reset_at;
    }

    /// Account for one dispatched request before the server confirms it.
    pub fn consume(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self::permissive(SystemTime::now())
    }
}

/// A [`RateLimitState`] which can be shared between clients and tasks.
///
/// Cloning a `RateLimit` yields another handle to the same state. Every
/// operation locks the state for its whole read-modify-write, so the three
/// fields are never observed torn.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    state: Arc<Mutex<RateLimitState>>,
}

impl RateLimit {
    /// Create a new isolated state with permissive defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new isolated handle starting from the given state
    #[must_use]
    pub fn with_state(state: RateLimitState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// The remaining request count and the reset time, read together.
    #[must_use]
    pub fn snapshot(&self) -> (u64, SystemTime) {
        let state = self.lock();
        (state.remaining, state.reset_at)
    }

    /// Requests per window, as last reported
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.lock().limit
    }

    /// A copy of the full state
    #[must_use]
    pub fn state(&self) -> RateLimitState {
        *self.lock()
    }

    /// See [`RateLimitState::wait_time`]
    #[must_use]
    pub fn wait_time(&self, now: SystemTime) -> Option<Duration> {
        self.lock().wait_time(now)
    }

    /// See [`RateLimitState::apply_headers`]
    pub fn apply_headers(&self, headers: &RateLimitHeaders) {
        self.lock().apply_headers(headers);
    }

    /// See [`RateLimitState::apply_rejection`]
    pub fn apply_rejection(&self, limit: u64, remaining: u64, reset_at: SystemTime) {
        self.lock().apply_rejection(limit, remaining, reset_at);
    }

    /// Record a dispatched request which was not rejected.
    ///
    /// Decrements the remaining count and then applies the response headers,
    /// so whatever the server reported takes precedence.
    pub fn record_response(&self, headers: &RateLimitHeaders) {
        let mut state = self.lock();
        state.consume();
        state.apply_headers(headers);
    }

    /// Returns `true` if both handles point to the same state
    #[must_use]
    pub fn shares_state_with(&self, other: &RateLimit) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    // None of the critical sections can leave the state half-written,
    // so a poisoned lock still holds a usable value.
    fn lock(&self) -> MutexGuard<'_, RateLimitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    use pretty_assertions::assert_eq;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_permissive_default_never_waits() {
        let now = SystemTime::now();
        let state = RateLimitState::permissive(now);
        assert_eq!(state.limit, 1);
        assert_eq!(state.remaining, 1);
        assert_eq!(state.wait_time(now), None);
    }

    #[test]
    fn test_no_wait_with_remaining_capacity() {
        let state = RateLimitState {
            limit: 10,
            remaining: 1,
            reset_at: at(2_000),
        };
        assert_eq!(state.wait_time(at(1_000)), None);
    }

    #[test]
    fn test_wait_until_reset() {
        let state = RateLimitState {
            limit: 10,
            remaining: 0,
            reset_at: at(1_002),
        };
        assert_eq!(state.wait_time(at(1_000)), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_no_wait_after_reset() {
        let state = RateLimitState {
            limit: 10,
            remaining: 0,
            reset_at: at(1_000),
        };
        assert_eq!(state.wait_time(at(1_000)), None);
        assert_eq!(state.wait_time(at(1_001)), None);
    }

    #[test]
    fn test_partial_header_update() {
        let mut state = RateLimitState {
            limit: 10,
            remaining: 5,
            reset_at: at(42),
        };
        state.apply_headers(&RateLimitHeaders {
            remaining: Some(3),
            ..RateLimitHeaders::default()
        });
        assert_eq!(
            state,
            RateLimitState {
                limit: 10,
                remaining: 3,
                reset_at: at(42),
            }
        );
    }

    #[test]
    fn test_rejection_overrides_everything() {
        let rate_limit = RateLimit::with_state(RateLimitState {
            limit: 100,
            remaining: 50,
            reset_at: at(10),
        });
        rate_limit.apply_rejection(5, 0, at(99));
        assert_eq!(rate_limit.snapshot(), (0, at(99)));
        assert_eq!(rate_limit.limit(), 5);
    }

    #[test]
    fn test_record_response_decrements_without_headers() {
        let rate_limit = RateLimit::with_state(RateLimitState {
            limit: 10,
            remaining: 1,
            reset_at: at(10),
        });
        rate_limit.record_response(&RateLimitHeaders::default());
        assert_eq!(rate_limit.snapshot(), (0, at(10)));

        // saturates at zero
        rate_limit.record_response(&RateLimitHeaders::default());
        assert_eq!(rate_limit.snapshot(), (0, at(10)));
    }

    #[test]
    fn test_record_response_headers_win_over_decrement() {
        let rate_limit = RateLimit::with_state(RateLimitState {
            limit: 10,
            remaining: 5,
            reset_at: at(10),
        });
        rate_limit.record_response(&RateLimitHeaders {
            remaining: Some(7),
            limit: None,
            reset_at: Some(at(20)),
        });
        assert_eq!(
            rate_limit.state(),
            RateLimitState {
                limit: 10,
                remaining: 7,
                reset_at: at(20),
            }
        );
    }

    #[test]
    fn test_clones_share_state() {
        let first = RateLimit::new();
        let second = first.clone();
        assert!(first.shares_state_with(&second));
        assert!(!first.shares_state_with(&RateLimit::new()));

        second.apply_rejection(3, 0, at(5));
        assert_eq!(first.snapshot(), (0, at(5)));
    }

    #[tokio::test]
    async fn test_concurrent_decrements_are_not_lost() {
        let rate_limit = RateLimit::with_state(RateLimitState {
            limit: 1_000,
            remaining: 1_000,
            reset_at: at(10),
        });

        let tasks: Vec<_> = (0..100)
            .map(|_| {
                let rate_limit = rate_limit.clone();
                tokio::spawn(async move { rate_limit.record_response(&RateLimitHeaders::default()) })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(rate_limit.snapshot().0, 900);
    }
}
