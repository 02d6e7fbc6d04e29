use crate::commands::Command;
use crate::verbosity::Verbosity;
use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, time::Duration};
use zeit_lib::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

pub(crate) const ZEIT_CONFIG_FILE: &str = "zeit.toml";

// Macro for generating default functions to be used by serde
macro_rules! default_function {
    ( $( $name:ident : $T:ty = $e:expr; )* ) => {
        $(
            #[allow(clippy::missing_const_for_fn)]
            fn $name() -> $T {
                $e
            }
        )*
    };
}

default_function! {
    base_url: String = DEFAULT_BASE_URL.to_string();
    user_agent: String = DEFAULT_USER_AGENT.to_string();
    timeout: u64 = DEFAULT_TIMEOUT_SECS;
    verbosity: Verbosity = Verbosity::default();
}

// Macro for merging configuration values
macro_rules! fold_in {
    ($cli:ident , $toml:ident ; $ty:ident { $(..$ignore:ident,)* $( $key:ident : $default:expr, )* } ) => {
        if (false) {
            #[allow(dead_code, unused, clippy::diverging_sub_expression)]
            let _check_fold_in_exhaustivity = $ty {
                $($key: unreachable!(), )*
                $($ignore: unreachable!(), )*
            };
        };
        $(
            if $cli.$key == $default && $toml.$key != $default {
                $cli.$key = $toml.$key;
            }
        )*
    };
}

/// Command-line client for the ZEIT domains and DNS API
#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct ZeitOptions {
    /// Configuration file to use, `zeit.toml` in the current directory if it exists
    #[arg(short, long = "config", global = true)]
    pub(crate) config_file: Option<PathBuf>,

    #[clap(flatten)]
    pub(crate) config: Config,

    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Options shared by all commands, from the command line, the environment or
/// the configuration file
#[derive(clap::Args, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Verbose program output
    #[clap(flatten)]
    #[serde(default = "verbosity")]
    pub(crate) verbose: Verbosity,

    /// API token
    #[arg(long, env = "ZEIT_TOKEN", hide_env_values = true, global = true)]
    #[serde(default)]
    pub(crate) token: Option<SecretString>,

    /// Team to act on instead of the personal account
    #[arg(long, env = "ZEIT_TEAM", global = true)]
    #[serde(default)]
    pub(crate) team: Option<String>,

    /// Root URL of the API
    #[arg(long, default_value = DEFAULT_BASE_URL, global = true)]
    #[serde(default = "base_url")]
    pub(crate) base_url: String,

    /// User agent
    #[arg(long, default_value = DEFAULT_USER_AGENT, global = true)]
    #[serde(default = "user_agent")]
    pub(crate) user_agent: String,

    /// Request timeout in seconds from connect to response finished
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    #[serde(default = "timeout")]
    pub(crate) timeout: u64,

    /// Give up on a request which would have to wait longer than this for
    /// the rate limit to reset, e.g. `30s` or `5m`.
    /// Requests wait as long as needed by default.
    #[arg(long, value_parser = humantime::parse_duration, global = true, verbatim_doc_comment)]
    #[serde(default, with = "humantime_serde")]
    pub(crate) rate_limit_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from a file
    pub(crate) fn load_from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).with_context(|| "Failed to parse configuration file")
    }

    /// Merge the configuration from TOML into the CLI configuration
    pub(crate) fn merge(&mut self, toml: Config) {
        // SecretString does not implement Eq, so the token is not folded in
        if self.token.is_none() && toml.token.is_some() {
            self.token = toml.token;
        }

        fold_in! {
            self, toml;

            Config {
                ..token,

                verbose: Verbosity::default(),
                team: None,
                base_url: DEFAULT_BASE_URL,
                user_agent: DEFAULT_USER_AGENT,
                timeout: DEFAULT_TIMEOUT_SECS,
                rate_limit_timeout: None,
            }
        }
    }

    /// Timeout as a `Duration`
    pub(crate) const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
