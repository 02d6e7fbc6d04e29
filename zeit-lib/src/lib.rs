//! `zeit_lib` is a client for the domains and DNS API of ZEIT.
//!
//! All requests go through a single gateway which tracks the rate limit the
//! API reports. Requests are held back while the limit is exhausted and
//! repeated when the API rejects them with `429 Too Many Requests`, so
//! callers never see a rate limit rejection.
//!
//! ```no_run
//! use zeit_lib::{ClientBuilder, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let client = ClientBuilder::builder().token("my-token").build().client()?;
//!   for domain in client.list_domains().await? {
//!     println!("{}", domain.name);
//!   }
//!   Ok(())
//! }
//! ```
//!
//! Clients which use the same token in one process can share their rate
//! limit through a [`ratelimit::RateLimitRegistry`]:
//!
//! ```no_run
//! use zeit_lib::{ClientBuilder, Record, RecordType, Result, ratelimit::RateLimitRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!   let registry = RateLimitRegistry::new();
//!   let client = ClientBuilder::builder()
//!     .token("my-token")
//!     .team(Some("team_123".to_string()))
//!     .rate_limits(Some(registry.clone()))
//!     .build()
//!     .client()?;
//!
//!   let record = Record::new(RecordType::Cname, "www", "alias.zeit.co");
//!   let id = client.create_dns_record("example.com", &record).await?;
//!   println!("created {id}");
//!   Ok(())
//! }
//! ```

mod api;
mod client;
mod types;

pub mod ratelimit;
#[cfg(test)]
mod test_utils;

pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, Transport,
};
pub use types::*;
