//! The request gateway used by every API call.
//!
//! This module defines two structs, [`Client`] and [`ClientBuilder`].
//! `Client` sends authenticated requests to the API, holding requests back
//! while the rate limit is exhausted and transparently repeating requests
//! which the API rejected with `429 Too Many Requests`.
//! `ClientBuilder` exposes a finer level of granularity for building
//! a `Client`.
#![allow(
    clippy::module_name_repetitions,
    clippy::default_trait_access,
    clippy::used_underscore_binding
)]
use http::header::{self, HeaderValue};
use http::{Method, StatusCode};
use reqwest::{Request, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    ErrorKind, Result,
    ratelimit::{RateLimit, RateLimitHeaders, RateLimitRegistry, RateLimitRejection},
};

mod transport;

pub use transport::Transport;

/// Default root of the API, `https://api.zeit.co`.
pub const DEFAULT_BASE_URL: &str = "https://api.zeit.co";
/// Default timeout in seconds before a request is deemed as failed, 20.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Default user agent, `zeit/<PKG_VERSION>`.
pub const DEFAULT_USER_AGENT: &str = concat!("zeit/", env!("CARGO_PKG_VERSION"));

/// Name of the query parameter which scopes a request to a team
const TEAM_QUERY_PARAMETER: &str = "teamId";

/// Builder for [`Client`].
///
/// See crate-level documentation for usage example.
#[derive(TypedBuilder, Debug, Clone)]
#[builder(field_defaults(setter(into)))]
#[builder(builder_method(doc = "
Create a builder for building `ClientBuilder`.

On the builder call, call methods with same name as its fields to set their values.

Finally, call `.build()` to create the instance of `ClientBuilder`.
"))]
pub struct ClientBuilder {
    /// API token sent as bearer token with every request.
    token: SecretString,

    /// Root URL of the API.
    ///
    /// Endpoint paths such as `v4/domains` are appended to it.
    #[builder(default_code = "String::from(DEFAULT_BASE_URL)")]
    base_url: String,

    /// Scope all requests to this team.
    ///
    /// Requests act on the personal account if this is `None`.
    #[builder(default)]
    team: Option<String>,

    /// User-agent sent with every request.
    #[builder(default_code = "String::from(DEFAULT_USER_AGENT)")]
    user_agent: String,

    /// Response timeout per request, `None` waits indefinitely.
    ///
    /// Only applies to the default transport.
    #[builder(default_code = "Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS))")]
    timeout: Option<Duration>,

    /// Upper bound for the time a single request may spend waiting for the
    /// rate limit to reset.
    ///
    /// A request which would have to wait longer fails with
    /// [`ErrorKind::RateLimitTimeout`] instead of sleeping. Without a budget,
    /// requests wait as long as the API asks them to.
    #[builder(default)]
    rate_limit_timeout: Option<Duration>,

    /// Share the rate limit with all clients using the same token.
    ///
    /// Without a registry the client keeps a rate limit of its own.
    #[builder(default)]
    rate_limits: Option<RateLimitRegistry>,

    /// Send requests through this transport instead of a `reqwest` client
    /// built from the options above.
    #[builder(default)]
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    /// Instantiates a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The token or the user-agent is not a valid header value.
    /// - The base URL is invalid.
    /// - The request client cannot be created.
    ///   See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn client(self) -> Result<Client> {
        let Self {
            token,
            base_url,
            team,
            user_agent,
            timeout,
            rate_limit_timeout,
            rate_limits,
            transport,
        } = self;

        let base_url = Url::parse(&base_url).map_err(|e| ErrorKind::InvalidUrl(base_url, e))?;

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
        authorization.set_sensitive(true);

        let user_agent = HeaderValue::from_str(&user_agent)?;

        let rate_limit = match rate_limits {
            Some(registry) => registry.state_for(token.expose_secret()),
            None => RateLimit::new(),
        };

        let transport = match transport {
            Some(transport) => transport,
            None => {
                let builder = reqwest::ClientBuilder::new().gzip(true);
                let reqwest_client = (match timeout {
                    Some(t) => builder.timeout(t),
                    None => builder,
                })
                .build()
                .map_err(ErrorKind::BuildRequestClient)?;
                Arc::new(reqwest_client)
            }
        };

        Ok(Client {
            transport,
            base_url,
            authorization,
            user_agent,
            team: team.filter(|team| !team.is_empty()),
            rate_limit,
            rate_limit_timeout,
        })
    }
}

/// Sends requests to the API.
///
/// All endpoint methods go through [`Client::execute`], which throttles
/// requests according to the rate limit the API reported last.
///
/// Clones share the transport and the rate limit, so a `Client` can be
/// cloned into as many tasks as needed.
///
/// See [`ClientBuilder`] which contains sane defaults for all configuration options.
#[derive(Debug, Clone)]
pub struct Client {
    /// Sends the actual HTTP requests
    transport: Arc<dyn Transport>,

    /// Root URL of the API
    base_url: Url,

    /// `Bearer` authorization header, marked as sensitive
    authorization: HeaderValue,

    /// User-agent header
    user_agent: HeaderValue,

    /// Optional team all requests are scoped to
    team: Option<String>,

    /// Rate limit shared with clones and, through a registry, with other
    /// clients using the same token
    rate_limit: RateLimit,

    /// Maximum time a single request may wait for the rate limit
    rate_limit_timeout: Option<Duration>,
}

impl Client {
    /// The team requests are scoped to, if any
    #[must_use]
    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    /// Scope all further requests of this client to `team`, or to the
    /// personal account if `team` is `None` or empty.
    ///
    /// Clones made before the change keep their scope.
    pub fn set_team(&mut self, team: Option<String>) {
        self.team = team.filter(|team| !team.is_empty());
    }

    /// The rate limit this client throttles against
    #[must_use]
    pub const fn rate_limit(&self) -> &RateLimit {
        &self.rate_limit
    }

    /// Send a request to the API.
    ///
    /// `path` is relative to the base URL, e.g. `v4/domains`. If `body` is
    /// given it is sent as JSON.
    ///
    /// This method:
    /// 1. Waits until the rate limit resets if no requests are left
    /// 2. Sends the request with authorization and team scope
    /// 3. On `429 Too Many Requests`, takes over the limits from the
    ///    response body and starts over from step 1
    /// 4. Otherwise updates the rate limit from the response headers
    ///
    /// Any other status is returned to the caller as-is; the body of the
    /// returned response is left unread.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - `path` does not form a valid URL together with the base URL.
    /// - `body` cannot be encoded.
    /// - The transport fails to send the request.
    /// - A rejection body does not contain the rate limit.
    /// - Waiting for the rate limit would exceed the rate limit timeout.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response> {
        self.execute_with_query(method, path, &[], body).await
    }

    /// Like [`Client::execute`], with query parameters appended to the URL.
    ///
    /// Names and values are percent-encoded.
    ///
    /// # Errors
    ///
    /// See [`Client::execute`].
    pub async fn execute_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<Response> {
        let url = self.endpoint(path, query)?;
        let body = body
            .map(|body| serde_json::to_vec(&body))
            .transpose()
            .map_err(ErrorKind::SerializeBody)?;

        let mut waited = Duration::ZERO;
        loop {
            if let Some(wait) = self.rate_limit.wait_time(SystemTime::now()) {
                if let Some(budget) = self.rate_limit_timeout
                    && waited + wait > budget
                {
                    return Err(ErrorKind::RateLimitTimeout { wait, budget });
                }
                log::info!("ZEIT rate limit hit, waiting for {}ms", wait.as_millis());
                sleep(wait).await;
                waited += wait;
            }

            log::debug!("{method} {url}");
            let request = self.request(method.clone(), url.clone(), body.as_deref());
            let response = self
                .transport
                .send(request)
                .await
                .map_err(ErrorKind::NetworkRequest)?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let bytes = response.bytes().await.map_err(ErrorKind::ReadResponseBody)?;
                let rejection = RateLimitRejection::from_slice(&bytes)?;
                log::warn!(
                    "ZEIT rate limit exceeded ({} of {} left): {}",
                    rejection.limit.remaining,
                    rejection.limit.total,
                    rejection.message
                );
                self.rate_limit.apply_rejection(
                    rejection.limit.total,
                    rejection.limit.remaining,
                    rejection.reset_at()?,
                );
                continue;
            }

            let headers = RateLimitHeaders::from_headers(response.headers());
            if !headers.is_empty() {
                log::debug!("{method} {url}: rate limit {headers:?}");
            }
            self.rate_limit.record_response(&headers);
            return Ok(response);
        }
    }

    /// Build the URL for `path` with `query`, scoped to the team if one is set
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| ErrorKind::InvalidUrl(raw, e))?;
        // `query_pairs_mut` leaves a trailing `?` even if nothing is appended
        if !query.is_empty() || self.team.is_some() {
            let mut pairs = url.query_pairs_mut();
            pairs.extend_pairs(query);
            if let Some(team) = &self.team {
                pairs.append_pair(TEAM_QUERY_PARAMETER, team);
            }
        }
        Ok(url)
    }

    /// Build a request; called once per attempt since requests are consumed
    /// by the transport
    fn request(&self, method: Method, url: Url, body: Option<&[u8]>) -> Request {
        let mut request = Request::new(method, url);
        let headers = request.headers_mut();
        headers.insert(header::AUTHORIZATION, self.authorization.clone());
        headers.insert(header::USER_AGENT, self.user_agent.clone());
        if let Some(body) = body {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            *request.body_mut() = Some(body.to_vec().into());
        }
        request
    }
}
