mod config;
mod logging;

use std::collections::BTreeMap;

use clap::Parser;
use eyre::WrapErr;
use futures::future;
use porkbun::{Client, RecordOptions, UpdateNameServerOptions, UrlForwardOptions};
use serde::Serialize;

use self::config::{Args, Command, Config, RecordArgs};
use self::logging::Logger;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    #[cfg(feature = "dotenv")]
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    Logger::new(args.log_level).init()?;

    #[cfg(feature = "dotenv")]
    if let Ok(path) = dotenv {
        log::debug!("Loaded environment from {}", path.to_string_lossy());
    }

    let config = Config::from_args(&args).await?;

    let mut porkbun = Client::new().wrap_err("Failed to initialize HTTP client")?;
    porkbun.set_use_ipv4(config.ipv4);
    match config.credentials {
        Some(keys) => porkbun.set_credentials(keys),
        None if !matches!(args.command, Command::Pricing { .. }) => {
            log::warn!("No API credentials configured; Porkbun will reject this request.");
        },
        None => {},
    }

    run(&porkbun, args.command, config.dry_run).await
}

async fn run(porkbun: &Client, command: Command, dry_run: bool) -> eyre::Result<()> {
    match command {
        Command::Ping => {
            let addr = porkbun.ping(None).await.wrap_err("Failed to ping Porkbun")?;
            print_json(&addr)
        },

        Command::Pricing { tlds } => {
            let mut pricing = porkbun.get_domain_pricing().await.wrap_err("Failed to fetch pricing")?;
            if !tlds.is_empty() {
                pricing.retain(|tld, _| tlds.iter().any(|t| t.trim_start_matches('.') == tld.as_str()));
            }
            print_json(&pricing)
        },

        Command::Domains => match porkbun.get_all_domains(None).await {
            Ok(domains) => print_json(&domains),
            Err(err) => {
                // Still show whatever was listed before the failure.
                if !err.domains.is_empty() {
                    print_json(&err.domains)?;
                }
                Err(err).wrap_err("Failed to list domains")
            },
        },

        Command::Records {
            domains,
            record_type,
            name,
        } => {
            let name = name.as_deref().unwrap_or_default();
            let tasks = domains.iter().map(|domain| async move {
                log::info!("Getting records for {domain}...");
                let records = match record_type {
                    Some(typ) => {
                        let options = RecordOptions::new(domain, typ).name(name);
                        porkbun.get_records_by_name_and_type(&options).await
                    },
                    None => porkbun.get_all_records(domain, None).await,
                };

                let records = records.wrap_err_with(|| format!("Failed to get records for {domain}"))?;
                eyre::Ok((domain.as_str(), records))
            });

            let results: BTreeMap<_, _> = future::try_join_all(tasks).await?.into_iter().collect();
            print_json(&results)
        },

        Command::Record { domain, id } => {
            let record = porkbun.get_record_by_id(&domain, &id, None).await?;
            print_json(&record)
        },

        Command::CreateRecord { domain, record } => {
            let options = record_options(&domain, record);
            if dry_run {
                log::info!("(DRY RUN) Skipped creating '{}' record on {domain}", options.record_type);
                return Ok(());
            }

            let id = porkbun.create_record(&options).await.wrap_err("Failed to create record")?;
            log::info!("New '{}' record {id} created on {domain}", options.record_type);
            print_json(&id)
        },

        Command::EditRecord { domain, id, record } => {
            let options = record_options(&domain, record).id(&id);
            if dry_run {
                log::info!("(DRY RUN) Skipped editing record {id} on {domain}");
                return Ok(());
            }

            porkbun.edit_record_by_id(&options).await.wrap_err("Failed to edit record")?;
            log::info!("Edited record {id} on {domain}");
            Ok(())
        },

        Command::EditRecords { domain, record } => {
            let options = record_options(&domain, record);
            if dry_run {
                log::info!("(DRY RUN) Skipped editing '{}' records on {domain}", options.record_type);
                return Ok(());
            }

            porkbun.edit_records_by_name_and_type(&options).await.wrap_err("Failed to edit records")?;
            log::info!("Edited '{}' records on {domain}", options.record_type);
            Ok(())
        },

        Command::DeleteRecord { domain, id } => {
            if dry_run {
                log::info!("(DRY RUN) Skipped deleting record {id} on {domain}");
                return Ok(());
            }

            porkbun.delete_record_by_id(&domain, &id, None).await.wrap_err("Failed to delete record")?;
            log::info!("Deleted record {id} on {domain}");
            Ok(())
        },

        Command::DeleteRecords {
            domain,
            record_type,
            name,
        } => {
            let options = RecordOptions::new(&domain, record_type).name(name.unwrap_or_default());
            if dry_run {
                log::info!("(DRY RUN) Skipped deleting '{record_type}' records on {domain}");
                return Ok(());
            }

            porkbun.delete_records_by_name_and_type(&options).await.wrap_err("Failed to delete records")?;
            log::info!("Deleted '{record_type}' records on {domain}");
            Ok(())
        },

        Command::Nameservers { domain } => {
            let ns = porkbun.get_name_servers(&domain, None).await?;
            print_json(&ns)
        },

        Command::SetNameservers { domain, nameservers } => {
            if dry_run {
                log::info!("(DRY RUN) Skipped setting nameservers of {domain} to {}", nameservers.join(", "));
                return Ok(());
            }

            let options = UpdateNameServerOptions::new(&domain, nameservers);
            porkbun.update_name_servers(&options).await.wrap_err("Failed to update nameservers")?;
            log::info!("Updated nameservers of {domain}");
            Ok(())
        },

        Command::Forwards { domain } => {
            let forwards = porkbun.get_url_forwards(&domain, None).await?;
            print_json(&forwards)
        },

        Command::AddForward {
            domain,
            location,
            forward_type,
            subdomain,
            include_path,
            wildcard,
        } => {
            if dry_run {
                log::info!("(DRY RUN) Skipped adding {forward_type} forward from {domain} to {location}");
                return Ok(());
            }

            let options = UrlForwardOptions::new(&domain, &location, forward_type)
                .subdomain(subdomain.unwrap_or_default())
                .include_path(include_path)
                .wildcard(wildcard);
            porkbun.create_url_forward(&options).await.wrap_err("Failed to add URL forward")?;
            log::info!("Added {forward_type} forward from {domain} to {location}");
            Ok(())
        },

        Command::DeleteForward { domain, id } => {
            if dry_run {
                log::info!("(DRY RUN) Skipped deleting URL forward {id} on {domain}");
                return Ok(());
            }

            porkbun.delete_url_forward(&domain, &id, None).await.wrap_err("Failed to delete URL forward")?;
            log::info!("Deleted URL forward {id} on {domain}");
            Ok(())
        },

        Command::Ssl { domain } => {
            let bundle = porkbun.get_ssl_bundle(&domain, None).await?;
            print_json(&bundle)
        },
    }
}

fn record_options(domain: &str, args: RecordArgs) -> RecordOptions {
    let mut options = RecordOptions::new(domain, args.record_type)
        .name(args.name.unwrap_or_default())
        .content(args.content);
    options.ttl = args.ttl;
    options.priority = args.prio;
    options.notes = args.notes;
    options
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(value).wrap_err("Failed to format output")?;
    println!("{json}");
    Ok(())
}
