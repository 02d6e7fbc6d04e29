use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use super::RateLimit;

/// Shares one [`RateLimit`] between all clients using the same API token.
///
/// The API accounts requests per token, so clients authenticating with the
/// same token should throttle against the same window. States are created
/// lazily on first use and live as long as the registry.
///
/// Clients which are not given a registry keep an isolated state instead.
///
/// # Examples
///
/// ```
/// use zeit_lib::ratelimit::RateLimitRegistry;
///
/// let registry = RateLimitRegistry::new();
/// let first = registry.state_for("token");
/// let second = registry.state_for("token");
/// assert!(first.shares_state_with(&second));
/// assert!(!first.shares_state_with(&registry.state_for("other-token")));
/// ```
#[derive(Clone, Default)]
pub struct RateLimitRegistry {
    /// Map of API token to its rate limit, created on-demand
    limits: Arc<DashMap<String, RateLimit>>,
}

impl RateLimitRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the rate limit for `token`, creating a permissive one if this is
    /// the first time the token is seen.
    #[must_use]
    pub fn state_for(&self, token: &str) -> RateLimit {
        // `entry` holds the shard lock, so concurrent first uses of a token
        // agree on a single state
        self.limits.entry(token.to_owned()).or_default().clone()
    }

    /// Forget the rate limit of `token`.
    /// Returns `true` if the token was known.
    ///
    /// Clients created before the removal keep their handle.
    pub fn remove(&self, token: &str) -> bool {
        self.limits.remove(token).is_some()
    }

    /// Number of tokens with a tracked rate limit
    #[must_use]
    pub fn len(&self) -> usize {
        self.limits.len()
    }

    /// Returns `true` if no token has been seen yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

// Keys are API tokens and must not end up in logs
impl fmt::Debug for RateLimitRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitRegistry")
            .field("tokens", &self.limits.len())
            .finish()
    }
}
