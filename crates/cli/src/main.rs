// fleetrecon CLI - reconcile the local and remote fleet datasets into a
// styled XLSX inspection report

mod exit_codes;
mod fetch;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "fleetrecon")]
#[command(about = "Reconcile fleet vehicle datasets into a styled XLSX inspection report")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the report: read the local CSV, fetch the remote dataset,
    /// reconcile, annotate, export XLSX
    #[command(after_help = "\
Examples:
  fleetrecon run -k kurzname -k info -k lagerort
  fleetrecon run -k kurzname,labelIds --colored false
  fleetrecon run -k kurzname --config job.toml --out report.xlsx
  FLEETRECON_API_USERNAME=365 FLEETRECON_API_PASSWORD=... \\
  FLEETRECON_API_BASIC_AUTH=... fleetrecon run -k kurzname")]
    Run(run::RunArgs),

    /// Validate a job config without touching the network
    #[command(after_help = "\
Examples:
  fleetrecon validate --config job.toml
  fleetrecon validate")]
    Validate {
        /// Path to the job TOML config (built-in defaults when omitted)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Pull data from the fleet API
    Fetch {
        #[command(subcommand)]
        command: fetch::FetchCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run::cmd_run(args),
        Commands::Validate { config } => run::cmd_validate(config),
        Commands::Fetch { command } => fetch::cmd_fetch(command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_IO,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_PARSE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_CONFIG,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
