use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;
use serde_json::{Value, json};
use zeit_lib::{Client, Record, RecordType};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Manage domains
    #[command(subcommand)]
    Domains(DomainsCommand),

    /// Manage DNS records
    #[command(subcommand)]
    Dns(DnsCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum DomainsCommand {
    /// List all domains
    List,

    /// Show a single domain
    Get { name: String },

    /// Add an external domain
    Add { name: String },

    /// Remove a domain
    Remove { name: String },

    /// Verify the ownership of a domain
    Verify { name: String },

    /// Check whether a domain can be bought
    Available { name: String },

    /// Show the price of a domain
    Price { name: String },

    /// Buy a domain
    Buy {
        name: String,

        /// Price in US dollars, as shown by `zeit domains price`
        #[arg(long)]
        expected_price: u64,
    },

    /// Transfer a domain registered elsewhere
    TransferIn {
        name: String,

        /// Authorization code issued by the current registrar
        #[arg(long)]
        auth_code: String,

        /// Transfer price in US dollars
        #[arg(long)]
        expected_price: u64,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum DnsCommand {
    /// List the DNS records of a domain
    List { domain: String },

    /// Create a DNS record
    Add {
        domain: String,

        /// Subdomain, or an empty string for the domain itself
        name: String,

        /// One of A, AAAA, ALIAS, CAA, CNAME, MX, SRV or TXT
        #[arg(value_name = "TYPE")]
        record_type: RecordType,

        value: String,

        /// Priority of MX and SRV records
        #[arg(long)]
        priority: Option<u32>,
    },

    /// Remove a DNS record
    Remove { domain: String, record_id: String },
}

/// Run `command` and return what should be printed, if anything
pub(crate) async fn run(client: &Client, command: &Command) -> Result<Option<Value>> {
    match command {
        Command::Domains(command) => domains(client, command).await,
        Command::Dns(command) => dns(client, command).await,
    }
}

async fn domains(client: &Client, command: &DomainsCommand) -> Result<Option<Value>> {
    let output = match command {
        DomainsCommand::List => to_value(client.list_domains().await?)?,
        DomainsCommand::Get { name } => to_value(client.get_domain(name).await?)?,
        DomainsCommand::Add { name } => to_value(client.add_domain(name).await?)?,
        DomainsCommand::Remove { name } => json!({ "uid": client.remove_domain(name).await? }),
        DomainsCommand::Verify { name } => to_value(client.verify_domain(name).await?)?,
        DomainsCommand::Available { name } => {
            json!({ "available": client.check_domain_availability(name).await? })
        }
        DomainsCommand::Price { name } => to_value(client.check_domain_price(name).await?)?,
        DomainsCommand::Buy {
            name,
            expected_price,
        } => {
            client
                .buy_domain(name, *expected_price)
                .await
                .with_context(|| format!("Cannot buy `{name}`"))?;
            return Ok(None);
        }
        DomainsCommand::TransferIn {
            name,
            auth_code,
            expected_price,
        } => to_value(
            client
                .transfer_in_domain(name, auth_code, *expected_price)
                .await?,
        )?,
    };
    Ok(Some(output))
}

async fn dns(client: &Client, command: &DnsCommand) -> Result<Option<Value>> {
    let output = match command {
        DnsCommand::List { domain } => to_value(client.list_dns_records(domain).await?)?,
        DnsCommand::Add {
            domain,
            name,
            record_type,
            value,
            priority,
        } => {
            let mut record = Record::new(*record_type, name.as_str(), value.as_str());
            match record_type {
                RecordType::Mx => record.mx_priority = *priority,
                RecordType::Srv => record.srv_priority = *priority,
                _ => {}
            }
            json!({ "uid": client.create_dns_record(domain, &record).await? })
        }
        DnsCommand::Remove { domain, record_id } => {
            client
                .remove_dns_record(domain, record_id)
                .await
                .with_context(|| format!("Cannot remove record `{record_id}` of `{domain}`"))?;
            return Ok(None);
        }
    };
    Ok(Some(output))
}

fn to_value<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("Cannot encode output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(subcommand)]
        command: Command,
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["zeit"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).command
    }

    #[test]
    fn test_parse_domains() {
        assert_eq!(
            parse(&["domains", "list"]),
            Command::Domains(DomainsCommand::List)
        );
        assert_eq!(
            parse(&["domains", "buy", "example.com", "--expected-price", "17"]),
            Command::Domains(DomainsCommand::Buy {
                name: "example.com".to_string(),
                expected_price: 17
            })
        );
        assert_eq!(
            parse(&[
                "domains",
                "transfer-in",
                "example.com",
                "--auth-code",
                "abc",
                "--expected-price",
                "9"
            ]),
            Command::Domains(DomainsCommand::TransferIn {
                name: "example.com".to_string(),
                auth_code: "abc".to_string(),
                expected_price: 9
            })
        );
    }

    #[test]
    fn test_parse_dns_add() {
        assert_eq!(
            parse(&["dns", "add", "example.com", "", "mx", "mail.example.com", "--priority", "10"]),
            Command::Dns(DnsCommand::Add {
                domain: "example.com".to_string(),
                name: String::new(),
                record_type: RecordType::Mx,
                value: "mail.example.com".to_string(),
                priority: Some(10),
            })
        );
    }

    #[test]
    fn test_invalid_record_type() {
        let result = Cli::try_parse_from(["zeit", "dns", "add", "example.com", "www", "NS", "x"]);
        assert!(result.is_err());
    }
}
