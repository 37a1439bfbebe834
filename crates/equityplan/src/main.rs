use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use equityplan::data::sample::{SAMPLE_CLIENT_ID, sample_client};
use equityplan::{DataConfig, DataDirectory, init_logging, report};
use equityplan_core::ingest::validate_extraction;
use equityplan_core::model::{Client, GrantId};
use equityplan_core::{
    PlanningConfig, aggregate_quarterly_tax, calculate_amt_room, evaluate_client, evaluate_clients,
    generate_vesting_schedule, resolve_rates,
};
use jiff::civil::Date;

#[derive(Parser, Debug)]
#[command(name = "equityplan")]
#[command(about = "Equity compensation tax planning for RSU, ISO, NSO and ESPP grants")]
struct Args {
    /// Path to the data directory (default: ~/.equityplan/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List clients in the data directory
    List,
    /// Full planning report for a client, or for every client with --all
    Report {
        /// Client id (default: the active client)
        client: Option<String>,
        /// Report on every readable client in the data directory
        #[arg(long, conflicts_with = "client")]
        all: bool,
        /// Evaluation date, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<Date>,
        /// ISO exercise-planning horizon in years (2-5)
        #[arg(long)]
        horizon: Option<u8>,
    },
    /// Vesting table for one grant
    Schedule {
        client: String,
        grant: String,
        #[arg(long)]
        as_of: Option<Date>,
    },
    /// Estimated tax payments for a year
    Quarterly {
        client: Option<String>,
        /// Tax year (default: the evaluation year)
        #[arg(long, value_parser = clap::value_parser!(i16).range(1..=9998))]
        year: Option<i16>,
        #[arg(long)]
        as_of: Option<Date>,
    },
    /// Validate extracted grant JSON and add the grant to a client
    Import {
        client: String,
        file: PathBuf,
        /// Id for the new grant (default: derived from the ticker)
        #[arg(long)]
        grant_id: Option<String>,
        /// Current share price (default: the extracted price, if any)
        #[arg(long)]
        price: Option<f64>,
    },
    /// Write a sample client and make it active
    Init,
}

fn today() -> Date {
    jiff::Zoned::now().date()
}

fn resolve_client_id(requested: Option<String>, config: &DataConfig) -> color_eyre::Result<String> {
    requested
        .or_else(|| config.active_client.clone())
        .ok_or_else(|| eyre!("no client given and no active client set; run `equityplan init` or name one"))
}

/// An id for an imported grant that does not collide with the client's grants.
fn unique_grant_id(client: &Client, ticker: &str) -> GrantId {
    let base = ticker.to_lowercase();
    let mut n = 1;
    loop {
        let id = GrantId(format!("{base}-{n}"));
        if client.grant(&id).is_none() {
            return id;
        }
        n += 1;
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = DataDirectory::new(args.data_dir.unwrap_or_else(DataDirectory::default_path));

    init_logging(data_dir.root(), &args.log_level)?;

    let config = data_dir.load_config()?;
    let mut out = String::new();

    match args.command {
        Command::List => {
            let clients = data_dir.list_clients()?;
            report::write_client_list(&mut out, &clients, config.active_client.as_deref())?;
        }
        Command::Report {
            client,
            all,
            as_of,
            horizon,
        } => {
            let planning = horizon
                .map(PlanningConfig::with_horizon)
                .unwrap_or_else(|| config.planning_config());
            let as_of = as_of.unwrap_or_else(today);

            if all {
                let clients = data_dir.load_all_clients()?;
                let reports = evaluate_clients(&clients, as_of, &planning);
                report::write_client_reports(&mut out, &clients, &reports)?;
            } else {
                let client = data_dir.load_client(&resolve_client_id(client, &config)?)?;
                let client_report = evaluate_client(&client, as_of, &planning);
                report::write_client_report(&mut out, &client, &client_report)?;
            }
        }
        Command::Schedule {
            client,
            grant,
            as_of,
        } => {
            let client = data_dir.load_client(&client)?;
            let grant = client
                .grant(&GrantId(grant.clone()))
                .ok_or_else(|| eyre!("client {} has no grant '{grant}'", client.id))?;
            let events = generate_vesting_schedule(grant, &client, as_of.unwrap_or_else(today));
            report::write_schedule(&mut out, grant, &events)?;
        }
        Command::Quarterly {
            client,
            year,
            as_of,
        } => {
            let client = data_dir.load_client(&resolve_client_id(client, &config)?)?;
            let as_of = as_of.unwrap_or_else(today);
            let year = year.unwrap_or(as_of.year());
            let quarters = aggregate_quarterly_tax(
                &client.grants,
                &client.planned_exercises,
                calculate_amt_room(&client),
                &resolve_rates(&client),
                year,
                as_of,
            );
            report::write_quarterly(&mut out, year, &quarters)?;
        }
        Command::Import {
            client,
            file,
            grant_id,
            price,
        } => {
            let mut client = data_dir.load_client(&client)?;
            let content = std::fs::read_to_string(&file)
                .wrap_err_with(|| format!("reading {}", file.display()))?;
            let raw: serde_json::Value = serde_json::from_str(&content)
                .wrap_err_with(|| format!("{} is not valid JSON", file.display()))?;

            let validated = validate_extraction(&raw)?;
            for warning in &validated.warnings {
                out.push_str(&format!("warning: {warning}\n"));
            }

            let data = validated.data;
            let id = grant_id
                .map(GrantId)
                .unwrap_or_else(|| unique_grant_id(&client, &data.ticker));
            if client.grant(&id).is_some() {
                return Err(eyre!("client {} already has a grant '{id}'", client.id));
            }
            let current_price = price.or(data.current_price).unwrap_or(0.0);

            client.grants.push(data.into_grant(id.clone(), current_price));
            data_dir.save_client(&client)?;
            out.push_str(&format!("Imported grant {id} into {}\n", client.id));
        }
        Command::Init => {
            let client = sample_client();
            if data_dir.list_clients()?.iter().any(|c| c == SAMPLE_CLIENT_ID) {
                out.push_str("Sample client already exists\n");
            } else {
                data_dir.save_client(&client)?;
                out.push_str(&format!("Wrote sample client to {}\n", data_dir.root().display()));
            }
            data_dir.save_config(&DataConfig {
                active_client: Some(SAMPLE_CLIENT_ID.to_string()),
                ..config
            })?;
        }
    }

    print!("{out}");
    tracing::debug!("command finished");
    Ok(())
}
