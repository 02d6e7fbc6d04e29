//! `zeit` manages domains and DNS records through the ZEIT API.
//!
//! The binary is a wrapper around `zeit-lib`. Every command prints its
//! result as JSON:
//!
//! ```sh
//! zeit --token $TOKEN domains list
//! zeit domains price example.com
//! zeit dns add example.com www CNAME alias.zeit.co
//! zeit dns add example.com "" MX mail.example.com --priority 10
//! ```
//!
//! The token and team can also be taken from the `ZEIT_TOKEN` and
//! `ZEIT_TEAM` environment variables or from a `zeit.toml` file.
#![warn(clippy::all, clippy::pedantic)]
#![warn(
    absolute_paths_not_starting_with_crate,
    rustdoc::invalid_html_tags,
    missing_copy_implementations,
    missing_debug_implementations,
    semicolon_in_expressions_from_macros,
    unreachable_pub,
    unused_extern_crates,
    variant_size_differences,
    clippy::missing_const_for_fn
)]
#![deny(anonymous_parameters, macro_use_extern_crate)]

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use log::error;

use crate::logging::init_logging;
use crate::options::{Config, ZEIT_CONFIG_FILE, ZeitOptions};

mod client;
mod commands;
mod logging;
mod options;
mod verbosity;

/// A C-like enum that can be cast to `i32` and used as process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitCode {
    Success = 0,
    // NOTE: exit code 1 is used for any `Result::Err` bubbled up to `main()`
    // using the `?` operator, including errors returned by the API.
    #[allow(unused)]
    UnexpectedFailure = 1,
    ConfigFile = 3,
}

fn main() -> Result<()> {
    // std::process::exit doesn't guarantee that all destructors will be run,
    // therefore we wrap the main code in another function to ensure that.
    let exit_code = run_main()?;
    std::process::exit(exit_code);
}

/// Merge all provided config options into one.
/// This includes a potential config file, command-line- and environment variables
fn load_config() -> Result<ZeitOptions> {
    let mut opts = ZeitOptions::parse();

    init_logging(&opts.config.verbose);

    if let Some(config_file) = &opts.config_file {
        match Config::load_from_file(config_file) {
            Ok(c) => opts.config.merge(c),
            Err(e) => {
                bail!(
                    "Cannot load configuration file `{}`: {e:?}",
                    config_file.display()
                );
            }
        }
    } else {
        // Without an explicit config file, the default one is used if present.
        // An invalid default file is an error as well.
        let default_config = PathBuf::from(ZEIT_CONFIG_FILE);
        if default_config.is_file() {
            match Config::load_from_file(&default_config) {
                Ok(c) => opts.config.merge(c),
                Err(e) => {
                    bail!(
                        "Cannot load default configuration file `{}`: {e:?}",
                        default_config.display()
                    );
                }
            }
        }
    }

    if opts.config.token.is_none() {
        bail!(
            "No API token given; pass `--token`, set `ZEIT_TOKEN` or add `token` to the configuration file"
        );
    }

    Ok(opts)
}

/// Set up runtime and call zeit entrypoint
fn run_main() -> Result<i32> {
    use std::process::exit;

    let opts = match load_config() {
        Ok(opts) => opts,
        Err(e) => {
            error!("Error while loading config: {e}");
            exit(ExitCode::ConfigFile as i32);
        }
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(&opts))
}

/// Run the requested command
async fn run(opts: &ZeitOptions) -> Result<i32> {
    let client = client::create(&opts.config)?;
    if let Some(output) = commands::run(&client, &opts.command).await? {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(ExitCode::Success as i32)
}
