//! `fleetrecon fetch` — pull data from the fleet API.

pub(crate) mod common;
pub(crate) mod fleet_api;

use std::path::PathBuf;

use clap::Subcommand;

use crate::CliError;

pub(crate) use common::Credentials;
pub(crate) use fleet_api::FleetApiClient;

#[derive(Subcommand)]
pub enum FetchCommands {
    /// Fetch the active-vehicle dataset and write it as CSV
    #[command(after_help = "\
Examples:
  fleetrecon fetch vehicles --out vehicles.csv
  fleetrecon fetch vehicles --config job.toml
  FLEETRECON_API_USERNAME=365 FLEETRECON_API_PASSWORD=... \\
  FLEETRECON_API_BASIC_AUTH=... fleetrecon fetch vehicles")]
    Vehicles {
        /// Path to the job TOML config (built-in defaults when omitted)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// API username (default: FLEETRECON_API_USERNAME env)
        #[arg(long)]
        username: Option<String>,

        /// API password (default: FLEETRECON_API_PASSWORD env)
        #[arg(long)]
        password: Option<String>,

        /// Basic authorization token for the login call
        /// (default: FLEETRECON_API_BASIC_AUTH env)
        #[arg(long)]
        basic_auth: Option<String>,

        /// Output CSV file path (default: stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

pub(crate) fn cmd_fetch(command: FetchCommands) -> Result<(), CliError> {
    match command {
        FetchCommands::Vehicles {
            config,
            username,
            password,
            basic_auth,
            out,
            quiet,
        } => cmd_fetch_vehicles(config, username, password, basic_auth, out, quiet),
    }
}

fn cmd_fetch_vehicles(
    config: Option<PathBuf>,
    username: Option<String>,
    password: Option<String>,
    basic_auth: Option<String>,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = crate::run::load_config(config.as_deref())?;
    let credentials = Credentials::resolve(username, password, basic_auth)?;
    let client = FleetApiClient::new(&config.api, credentials);

    if !quiet {
        eprintln!("fetching active vehicles from {}", config.api.base_url);
    }
    let token = client.login()?;
    let table = client.fetch_vehicles(&token)?;
    if !quiet {
        eprintln!("  {} rows, {} columns", table.n_rows(), table.n_cols());
    }

    match out {
        Some(path) => {
            fleetrecon_io::csv::write(&table, &path).map_err(CliError::io)?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let csv = fleetrecon_io::csv::to_csv_string(&table).map_err(CliError::io)?;
            print!("{csv}");
        }
    }
    Ok(())
}
