use std::path::PathBuf;

use eyre::{WrapErr, eyre};
use porkbun::{Credentials, ForwardType, RecordType};
use serde::Deserialize;
use tokio::fs;

// Internal struct for command-line flags. Credentials and host selection may also come from a TOML file, which is
// loaded into `Config`.
#[derive(Debug, clap::Parser)]
#[command(version, about, max_term_width = 100)]
pub struct Args {
    /// Path to a TOML file containing API credentials and connection settings.
    #[arg(short, long, env = "PORKBUN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Porkbun API key. Takes precedence over the config file.
    #[arg(long, env = "PORKBUN_API_KEY", value_name = "KEY", hide_env_values = true, requires = "secret_api_key")]
    pub api_key: Option<String>,

    /// Porkbun secret API key. Takes precedence over the config file.
    #[arg(long, env = "PORKBUN_SECRET_API_KEY", value_name = "KEY", hide_env_values = true, requires = "api_key")]
    pub secret_api_key: Option<String>,

    /// Connect to Porkbun's IPv4-only API host.
    ///
    /// Useful with `ping` to discover this machine's public IPv4 address on a dual-stack network.
    #[arg(long)]
    pub ipv4: bool,

    /// Print what would be created, modified or deleted without changing anything on Porkbun.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Controls the verbosity of logs.
    ///
    /// Possible log levels are 'error', 'warn', 'info', 'debug', and 'trace' (in that order).
    #[arg(long, env = "PORKBUN_LOG_LEVEL", value_name = "LEVEL", default_value = "info")]
    pub log_level: log::LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Check credentials and print this machine's public IP address as seen by Porkbun.
    Ping,

    /// Print default registration, renewal and transfer prices.
    Pricing {
        /// Only show these TLDs (without the leading dot).
        tlds: Vec<String>,
    },

    /// List every domain on the account.
    Domains,

    /// List DNS records for one or more domains.
    Records {
        #[arg(required = true)]
        domains: Vec<String>,
        /// Only list records of this type.
        #[arg(long = "type", value_name = "TYPE")]
        record_type: Option<RecordType>,
        /// Only list records for this subdomain. Requires --type.
        #[arg(long, requires = "record_type")]
        name: Option<String>,
    },

    /// Print a single DNS record.
    Record { domain: String, id: String },

    /// Create a DNS record.
    CreateRecord {
        domain: String,
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Edit a DNS record by ID.
    EditRecord {
        domain: String,
        id: String,
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Edit every DNS record with the given subdomain and type.
    EditRecords {
        domain: String,
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete a DNS record by ID.
    DeleteRecord { domain: String, id: String },

    /// Delete every DNS record of a type, optionally restricted to one subdomain.
    DeleteRecords {
        domain: String,
        #[arg(long = "type", value_name = "TYPE")]
        record_type: RecordType,
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the authoritative nameservers of a domain.
    Nameservers { domain: String },

    /// Replace the authoritative nameservers of a domain.
    SetNameservers {
        domain: String,
        #[arg(required = true)]
        nameservers: Vec<String>,
    },

    /// List URL forwards for a domain.
    Forwards { domain: String },

    /// Add a URL forward.
    AddForward {
        domain: String,
        /// Destination URL.
        location: String,
        /// 'temporary' (302) or 'permanent' (301).
        #[arg(long = "type", value_name = "TYPE", default_value = "temporary")]
        forward_type: ForwardType,
        #[arg(long)]
        subdomain: Option<String>,
        /// Append the request path to the destination.
        #[arg(long)]
        include_path: bool,
        /// Forward every subdomain as well.
        #[arg(long)]
        wildcard: bool,
    },

    /// Delete a URL forward.
    DeleteForward { domain: String, id: String },

    /// Print the SSL certificate bundle for a domain.
    Ssl { domain: String },
}

/// Fields shared by the record-writing commands.
#[derive(Debug, clap::Args)]
pub struct RecordArgs {
    #[arg(long = "type", value_name = "TYPE")]
    pub record_type: RecordType,
    /// Subdomain, not including the domain itself. Omit or use '@' for the root.
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub content: String,
    /// Time to live in seconds (minimum 600).
    #[arg(long)]
    pub ttl: Option<u32>,
    #[arg(long)]
    pub prio: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
}

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    apikey: Option<String>,
    secretapikey: Option<String>,
    ipv4: bool,
}

/// Settings for the API client, merged from the config file and the command line.
#[derive(Debug)]
pub struct Config {
    pub credentials: Option<Credentials>,
    pub ipv4: bool,
    pub dry_run: bool,
}

impl Config {
    /// Loads runtime configuration from command line arguments and, if one was given, the config file.
    pub async fn from_args(args: &Args) -> eyre::Result<Self> {
        let file = match &args.config {
            Some(path) => {
                log::trace!("Reading configuration from {}", path.to_string_lossy());
                let text = fs::read_to_string(path).await.wrap_err("Failed to read config file")?;
                toml::from_str::<FileConfig>(&text).wrap_err("Failed to parse config file")?
            },
            None => FileConfig::default(),
        };

        let credentials = match (&args.api_key, &args.secret_api_key) {
            (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
            _ => match (file.apikey, file.secretapikey) {
                (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
                (None, None) => None,
                _ => {
                    return Err(eyre!("'apikey' and 'secretapikey' must be set together")
                        .wrap_err("Invalid configuration"));
                },
            },
        };

        Ok(Config {
            credentials,
            ipv4: args.ipv4 || file.ipv4,
            dry_run: args.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn file_config_reads_keys() {
        let file: FileConfig = toml::from_str("apikey = \"pk1_a\"\nsecretapikey = \"sk1_b\"\nipv4 = true\n").unwrap();
        assert_eq!(file.apikey.as_deref(), Some("pk1_a"));
        assert_eq!(file.secretapikey.as_deref(), Some("sk1_b"));
        assert!(file.ipv4);
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("api_key = \"pk1_a\"").is_err());
    }

    #[tokio::test]
    async fn command_line_keys_win() {
        let args = Args::parse_from([
            "porkbun",
            "--api-key",
            "pk1_cli",
            "--secret-api-key",
            "sk1_cli",
            "records",
            "example.com",
            "--type",
            "aaaa",
        ]);

        let config = Config::from_args(&args).await.unwrap();
        let keys = config.credentials.unwrap();
        assert_eq!(keys.api_key(), "pk1_cli");
        assert!(!config.ipv4);

        match args.command {
            Command::Records { record_type, .. } => assert_eq!(record_type, Some(RecordType::AAAA)),
            other => panic!("parsed wrong command: {other:?}"),
        }
    }

    #[test]
    fn record_name_requires_type() {
        let res = Args::try_parse_from(["porkbun", "records", "example.com", "--name", "www"]);
        assert!(res.is_err());
    }
}
