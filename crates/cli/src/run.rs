//! `fleetrecon run` / `fleetrecon validate` — the full report job and the
//! offline config check.

use std::path::{Path, PathBuf};

use clap::Args;
use fleetrecon_engine::{annotate, reconcile, AnnotateOptions, JobConfig, PipelineError, ReconcilePlan};

use crate::exit_codes;
use crate::fetch::{Credentials, FleetApiClient};
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Path to the job TOML config (built-in defaults when omitted)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output columns (repeatable; comma-separated accepted).
    /// The identifier and group columns are always included.
    #[arg(long, short = 'k', value_name = "COLS", required = true)]
    pub keys: Vec<String>,

    /// Color data rows by inspection recency
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    pub colored: bool,

    /// Output XLSX path (default: <output.dir>/vehicles_<timestamp>.xlsx)
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Local dataset CSV (overrides the config)
    #[arg(long)]
    pub local: Option<PathBuf>,

    /// API username (default: FLEETRECON_API_USERNAME env)
    #[arg(long)]
    pub username: Option<String>,

    /// API password (default: FLEETRECON_API_PASSWORD env)
    #[arg(long)]
    pub password: Option<String>,

    /// Basic authorization token for the login call
    /// (default: FLEETRECON_API_BASIC_AUTH env)
    #[arg(long)]
    pub basic_auth: Option<String>,

    /// Suppress progress on stderr
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

pub(crate) fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let keys = split_keys(&args.keys);
    if keys.is_empty() {
        return Err(CliError::args("at least one output column is required (-k)"));
    }

    // Extract: local CSV first, then the authenticated remote dataset.
    let local_path = args
        .local
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.local.file));
    progress(args.quiet, &format!("reading {}", local_path.display()));
    let local = fleetrecon_io::csv::import(&local_path).map_err(CliError::io)?;
    progress(
        args.quiet,
        &format!("  {} rows, {} columns", local.n_rows(), local.n_cols()),
    );

    let credentials = Credentials::resolve(args.username, args.password, args.basic_auth)?;
    let client = FleetApiClient::new(&config.api, credentials);
    progress(
        args.quiet,
        &format!("fetching active vehicles from {}", config.api.base_url),
    );
    let token = client.login()?;
    let remote = client.fetch_vehicles(&token)?;
    progress(
        args.quiet,
        &format!("  {} rows, {} columns", remote.n_rows(), remote.n_cols()),
    );

    // Transform: reconcile both sources, then compute the color signals.
    let plan = ReconcilePlan::new(&config.columns, keys.clone());
    let reconciled = reconcile(local, remote, &plan).map_err(pipeline_err)?;

    let font_color_enabled = keys.iter().any(|k| k == &config.columns.label_ids);
    let labels = client.label_colors(token);
    let opts = AnnotateOptions {
        label_column: config.columns.label_ids.clone(),
        date_column: config.columns.inspection_date.clone(),
        font_color_enabled,
        background_color_enabled: args.colored,
        reference_date: chrono::Local::now().date_naive(),
    };
    let styled = annotate(reconciled, &labels, &opts).map_err(pipeline_err)?;
    for warning in &styled.lookup_warnings {
        eprintln!("warning: {warning}");
    }

    // Load: persist the styled report.
    let out_path = match args.out {
        Some(path) => path,
        None => default_output_path(&config.output.dir),
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CliError::io(format!("cannot create {}: {e}", parent.display())))?;
        }
    }
    fleetrecon_io::xlsx::export(&styled, &out_path).map_err(CliError::io)?;

    eprintln!(
        "report: {} rows x {} columns -> {}",
        styled.table.n_rows(),
        styled.table.n_cols(),
        out_path.display(),
    );

    if styled.table.is_empty() {
        return Err(CliError {
            code: exit_codes::EXIT_EMPTY_REPORT,
            message: "report contains no data rows".into(),
            hint: Some("every merged record was missing an inspection date; the empty report file was still written".into()),
        });
    }
    Ok(())
}

pub(crate) fn cmd_validate(config_path: Option<PathBuf>) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;
    let c = &config.columns;
    eprintln!(
        "valid: join on '{}', inspection date '{}', group '{}', labels '{}'",
        c.join_key, c.inspection_date, c.group, c.label_ids,
    );
    eprintln!("  local file: {}", config.local.file);
    eprintln!("  api: {}", config.api.base_url);
    eprintln!("  output dir: {}", config.output.dir);
    Ok(())
}

/// Read + validate the job config; built-in defaults when no path is given.
pub(crate) fn load_config(path: Option<&Path>) -> Result<JobConfig, CliError> {
    match path {
        None => Ok(JobConfig::default()),
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("cannot read {}: {e}", path.display())))?;
            JobConfig::from_toml(&content).map_err(pipeline_err)
        }
    }
}

/// Repeatable `-k` values, with comma-separated lists accepted.
fn split_keys(keys: &[String]) -> Vec<String> {
    keys.iter()
        .flat_map(|k| k.split(','))
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

fn default_output_path(dir: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y-%m-%dT%H.%M.%S");
    PathBuf::from(dir).join(format!("vehicles_{timestamp}.xlsx"))
}

fn progress(quiet: bool, message: &str) {
    if !quiet {
        eprintln!("{message}");
    }
}

fn pipeline_err(err: PipelineError) -> CliError {
    match &err {
        PipelineError::ColumnNotFound { .. } => CliError::parse(err.to_string())
            .with_hint("check [columns] in the job config against both datasets"),
        PipelineError::InvalidDateFormat { .. } => CliError::parse(err.to_string()),
        PipelineError::ConfigParse(_) | PipelineError::ConfigValidation(_) => {
            CliError::config(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[test]
    fn keys_split_on_commas_and_trim() {
        let keys = split_keys(&["kurzname,hu".into(), " labelIds ".into(), "".into()]);
        assert_eq!(keys, vec!["kurzname", "hu", "labelIds"]);
    }

    #[test]
    fn default_output_path_is_timestamped_under_dir() {
        let path = default_output_path("output_data");
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(path.starts_with("output_data"));
        assert!(name.starts_with("vehicles_"));
        assert!(name.ends_with(".xlsx"));
        // the original naming keeps no colons in file names
        assert!(!name.contains(':'));
    }

    #[test]
    fn structural_errors_map_to_parse_exit_code() {
        let err = pipeline_err(PipelineError::ColumnNotFound { column: "hu".into() });
        assert_eq!(err.code, exit_codes::EXIT_PARSE);
        let err = pipeline_err(PipelineError::ConfigParse("bad".into()));
        assert_eq!(err.code, exit_codes::EXIT_CONFIG);
    }

    fn run_args(server: &MockServer, dir: &std::path::Path, keys: &[&str]) -> RunArgs {
        let config_path = dir.join("job.toml");
        std::fs::write(
            &config_path,
            format!("[api]\nbase_url = \"{}\"\n", server.base_url()),
        )
        .unwrap();
        RunArgs {
            config: Some(config_path),
            keys: keys.iter().map(|k| k.to_string()).collect(),
            colored: true,
            out: Some(dir.join("report.xlsx")),
            local: Some(dir.join("vehicles.csv")),
            username: Some("365".into()),
            password: Some("1".into()),
            basic_auth: Some("dGVzdA==".into()),
            quiet: true,
        }
    }

    fn mock_login(server: &MockServer) {
        server.mock(|when, then| {
            when.method(POST).path("/index.php/login");
            then.status(200)
                .json_body(serde_json::json!({"oauth": {"access_token": "tok"}}));
        });
    }

    #[test]
    fn full_job_writes_styled_report() {
        let server = MockServer::start();
        mock_login(&server);
        server.mock(|when, then| {
            when.method(GET).path("/dev/index.php/v1/vehicles/select/active");
            then.status(200).json_body(serde_json::json!([
                {"kurzname": "V1", "gruppe": "G2", "labelIds": "10"},
                {"kurzname": "V3", "gruppe": "G1", "labelIds": null},
            ]));
        });
        server.mock(|when, then| {
            when.method(GET).path("/dev/index.php/v1/labels/10");
            then.status(200)
                .json_body(serde_json::json!([{"colorCode": "#00ff00"}]));
        });

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vehicles.csv"),
            "kurzname;hu;gruppe\nV1;2022-01-01;\nV2;;G3\n",
        )
        .unwrap();

        // V1 merges with the remote row (null gruppe filled to G2);
        // V2 drops for its missing inspection date; V3 is remote-only with
        // no date and drops too.
        let args = run_args(&server, dir.path(), &["kurzname", "hu", "labelIds"]);
        let out = args.out.clone().unwrap();
        cmd_run(args).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn all_incomplete_rows_exit_as_empty_report() {
        let server = MockServer::start();
        mock_login(&server);
        server.mock(|when, then| {
            when.method(GET).path("/dev/index.php/v1/vehicles/select/active");
            then.status(200)
                .json_body(serde_json::json!([{"kurzname": "V9"}]));
        });

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vehicles.csv"), "kurzname;hu;gruppe\nV2;;G3\n")
            .unwrap();

        let args = run_args(&server, dir.path(), &["kurzname", "hu"]);
        let out = args.out.clone().unwrap();
        let err = cmd_run(args).unwrap_err();
        assert_eq!(err.code, exit_codes::EXIT_EMPTY_REPORT);
        // the empty report is still written
        assert!(out.exists());
    }
}
