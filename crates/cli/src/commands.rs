use clap::Subcommand;
use model::core::timestamp::Timestamp;

#[derive(Subcommand)]
pub enum Commands {
    /// Pull new logs for every configured log type
    Pull {
        #[arg(long, help = "Env file to load on top of the process environment")]
        env_file: Option<String>,

        #[arg(long, help = "Comma separated log types, overrides VELOCLOUD_LOGS_TO_PULL")]
        logs: Option<String>,

        #[arg(
            long,
            help = "Start of the window (e.g. 2024-01-01T00:00:00.000Z), ignores the saved run state"
        )]
        start: Option<Timestamp>,

        #[arg(long, help = "Write log output to this file instead of stderr")]
        log_file: Option<String>,

        #[arg(
            long,
            help = "If specified, writes the JSON run report to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Print the persisted run state
    State {
        #[arg(long, help = "Env file to load on top of the process environment")]
        env_file: Option<String>,
    },
    /// Print the windows the next pull would request, without contacting the portal
    Window {
        #[arg(long, help = "Env file to load on top of the process environment")]
        env_file: Option<String>,

        #[arg(long, help = "Start of the window, ignores the saved run state")]
        start: Option<Timestamp>,
    },
}

impl Commands {
    pub fn env_file(&self) -> Option<&str> {
        match self {
            Commands::Pull { env_file, .. }
            | Commands::State { env_file }
            | Commands::Window { env_file, .. } => env_file.as_deref(),
        }
    }

    pub fn log_file(&self) -> Option<&str> {
        match self {
            Commands::Pull { log_file, .. } => log_file.as_deref(),
            _ => None,
        }
    }
}
