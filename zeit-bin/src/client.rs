use crate::options::Config;
use anyhow::{Context, Result};
use zeit_lib::{Client, ClientBuilder};

/// Creates a client according to the command-line config
pub(crate) fn create(cfg: &Config) -> Result<Client> {
    let token = cfg
        .token
        .clone()
        .context("No API token given; pass `--token`, set `ZEIT_TOKEN` or add `token` to the configuration file")?;

    ClientBuilder::builder()
        .token(token)
        .base_url(cfg.base_url.clone())
        .team(cfg.team.clone())
        .user_agent(cfg.user_agent.clone())
        .timeout(cfg.timeout())
        .rate_limit_timeout(cfg.rate_limit_timeout)
        .build()
        .client()
        .context("Failed to create request client")
}
