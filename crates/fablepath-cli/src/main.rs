//! Fablepath command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fablepath_cli::config::{Config, LogFormat};
use fablepath_cli::error::AppError;
use fablepath_cli::recorder::{JsonlSessionRecorder, LogSessionRecorder, LoggingPointsAwarder};
use fablepath_cli::runner::{Collaborators, StoryFile, play_story, validate_story};
use fablepath_core::clock::SystemClock;
use fablepath_progress::domain::ports::SessionRecorder;
use fablepath_progress::domain::rewards::RewardPolicy;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "fablepath", version, about = "Validate and play branching stories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a story file and print the report.
    Validate {
        /// Story file (`.yaml`/`.yml` for YAML, anything else is JSON).
        file: PathBuf,
    },
    /// Publish a story file and play a list of choices against it.
    Play {
        /// Story file (`.yaml`/`.yml` for YAML, anything else is JSON).
        file: PathBuf,
        /// Comma-separated choice indices, e.g. `0,1`.
        #[arg(long, value_delimiter = ',')]
        choices: Vec<usize>,
        /// Player credited with the reward. Defaults to `FABLEPATH_PLAYER_ID`.
        #[arg(long)]
        player: Option<Uuid>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(err.exit_code());
        }
    };

    init_tracing(config.log_format);

    match run(cli, &config).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "fablepath failed");
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run(cli: Cli, config: &Config) -> Result<ExitCode, AppError> {
    match cli.command {
        Commands::Validate { file } => {
            let story = StoryFile::read(&file).await?;
            let report = validate_story(&story)?;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if report.is_publishable() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Play {
            file,
            choices,
            player,
        } => {
            let story = StoryFile::read(&file).await?;
            let player_id = player
                .or(config.default_player)
                .unwrap_or_else(Uuid::new_v4);

            let recorder: Box<dyn SessionRecorder> = match &config.record_path {
                Some(path) => Box::new(JsonlSessionRecorder::new(path.clone())),
                None => Box::new(LogSessionRecorder),
            };
            let policy = RewardPolicy::default();
            let deps = Collaborators {
                clock: &SystemClock,
                policy: &policy,
                recorder: recorder.as_ref(),
                awarder: &LoggingPointsAwarder,
            };

            let report = play_story(&story, &choices, player_id, &deps).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
