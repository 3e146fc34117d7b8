use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod config;
mod dates;
mod diff;
mod error;
mod executor;
mod filter;
mod http;
mod jira;
mod models;
mod normalize;
mod sync;
#[cfg(test)]
mod testing;
mod toggl;
mod tracker;
mod worklog;

use config::Config;
use dates::SyncWindow;
use jira::JiraClient;
use sync::SyncOptions;
use toggl::TogglClient;

const EX_DATAERR: u8 = 65;
const EX_UNAVAILABLE: u8 = 69;
const EX_SOFTWARE: u8 = 70;

#[derive(Parser)]
#[command(name = "toggl-track-sync", version, about = "Mirror Toggl Track time entries into Jira worklogs")]
struct Cli {
    /// Dotenv file with the JIRA_* / TOGGL_* settings (default: ./.env, then ~/.toggl-track-sync.env)
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Number of trailing days to sync, overrides SYNC_WINDOW_SIZE
    #[arg(long, value_name = "DAYS")]
    window: Option<String>,

    /// Compute and log the changes without touching Jira
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Could not load config ({err})");
            return ExitCode::from(EX_DATAERR);
        }
    };

    let window = SyncWindow::trailing(config.sync_window_size);
    let jira = JiraClient::new(&config.jira_endpoint, config.jira_access_token.clone());
    let toggl = TogglClient::new(&config.toggl_endpoint, config.toggl_api_key.clone());
    let options = SyncOptions {
        dry_run: cli.dry_run,
    };

    let outcome = match sync::run(&config, &jira, &toggl, &window, options) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("sync aborted: {err}");
            return ExitCode::from(EX_UNAVAILABLE);
        }
    };

    let Some(report) = &outcome.report else {
        log::info!("dry run finished, {} operations planned", outcome.plan.operation_count());
        return ExitCode::SUCCESS;
    };

    if outcome.is_success() {
        log::info!("finished sync successfully");
        return ExitCode::SUCCESS;
    }

    for failure in &report.failures {
        log::error!(
            "could not {} {}: {}",
            failure.kind.label(),
            failure.worklog.summary(),
            failure.reason
        );
    }
    log::error!(
        "sync finished with errors. {}/{} sync operations were successful",
        report.successful,
        report.total
    );
    ExitCode::from(EX_SOFTWARE)
}

fn load_config(cli: &Cli) -> Result<Config, error::ConfigError> {
    let mut config = Config::load(cli.env_file.as_deref())?;
    if let Some(raw) = &cli.window {
        config.sync_window_size = config::parse_window_size(raw)?;
    }
    Ok(config)
}
