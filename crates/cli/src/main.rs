use crate::{
    error::CliError,
    shutdown::{ExitStatus, cancel_on_signal},
};
use clap::Parser;
use commands::Commands;
use engine_config::{env::EnvManager, settings::Settings};
use engine_core::state::{RunStateStore, StateKey, file_store::FileRunStateStore};
use engine_runtime::execution::{executor, window};
use model::core::{log_type::LogType, timestamp::Timestamp};
use serde::Serialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod commands;
mod error;
mod logging;
mod output;
mod shutdown;

const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Parser)]
#[command(name = "velopull", version, about = "Pulls VeloCloud portal logs into local files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Serialize)]
struct StateEntry {
    key: String,
    path: String,
    value: Option<Timestamp>,
}

#[derive(Serialize)]
struct WindowEntry {
    log_type: LogType,
    start: Timestamp,
    end: Timestamp,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match load_settings(&cli.command) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(ExitStatus::Failure.code());
        }
    };

    let log_file = cli
        .command
        .log_file()
        .map(Path::new)
        .or(settings.script_log_file.as_deref());
    if let Err(err) = logging::init(&settings.log_level, log_file) {
        eprintln!("Error: {err}");
        std::process::exit(ExitStatus::Failure.code());
    }

    let result = execute(cli.command, &settings).await;
    match &result {
        Ok(()) => {}
        Err(err) if err.is_shutdown() => info!("Run interrupted, run state left unchanged"),
        Err(err) => error!("{}", err),
    }

    std::process::exit(ExitStatus::of(&result).code());
}

fn load_settings(command: &Commands) -> Result<Settings, CliError> {
    let mut env = EnvManager::from_process();
    match command.env_file() {
        Some(path) => env.load_from_file(path)?,
        None => {
            env.load_if_present(DEFAULT_ENV_FILE)?;
        }
    }

    let mut settings = Settings::from_env(&env)?;
    if let Commands::Pull {
        logs: Some(logs), ..
    } = command
    {
        settings.set_logs_to_pull(logs)?;
    }
    Ok(settings)
}

async fn execute(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::Pull { start, output, .. } => {
            let cancel = CancellationToken::new();
            cancel_on_signal(cancel.clone());

            let report = executor::run(settings, start, cancel.clone()).await?;
            info!(
                "Run {} finished, {} logs written",
                report.run_id,
                report.total_records()
            );
            if cancel.is_cancelled() {
                info!("Shutdown was requested after the last log type completed");
            }

            output::write_json(&report, output.as_deref()).await?;
        }
        Commands::State { .. } => {
            let store = FileRunStateStore::new(settings.time_file.clone());
            let keys: Vec<StateKey> = settings
                .logs_to_pull
                .iter()
                .map(|t| window::state_key(settings.run_state_mode, *t))
                .fold(Vec::new(), |mut keys, key| {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                    keys
                });

            let mut entries = Vec::with_capacity(keys.len());
            for key in keys {
                entries.push(StateEntry {
                    key: key.to_string(),
                    path: store.path_for(key).display().to_string(),
                    value: store.load(key).await?,
                });
            }
            output::write_json(&entries, None).await?;
        }
        Commands::Window { start, .. } => {
            let store = FileRunStateStore::new(settings.time_file.clone());
            let windows = window::preview(
                &store,
                settings.run_state_mode,
                &settings.logs_to_pull,
                start,
                Timestamp::now(),
                settings.lookback,
            )
            .await?;

            let entries: Vec<WindowEntry> = windows
                .into_iter()
                .map(|(log_type, w)| WindowEntry {
                    log_type,
                    start: w.start(),
                    end: w.end(),
                })
                .collect();
            output::write_json(&entries, None).await?;
        }
    }

    Ok(())
}
