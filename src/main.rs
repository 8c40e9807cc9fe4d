use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use qadesk::config::{ConfigError, StoreConfig};
use qadesk::replay::{ReplayError, ReplayOptions, replay};
use qadesk::store::{Action, RootState};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

#[derive(Parser, Debug)]
#[command(name = "qadesk", about = "Replay qadesk store actions and inspect the resulting state")]
struct Cli {
    /// JSON store config; defaults apply to missing fields.
    #[arg(long, env = "QADESK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the initial state tree.
    Defaults,
    /// Apply a JSON array of actions and print the final state tree.
    Replay {
        script: PathBuf,

        /// Value present in theme storage before startup.
        #[arg(long)]
        stored_theme: Option<String>,

        /// Report a system dark-mode preference to the theme initializer.
        #[arg(long)]
        prefers_dark: bool,

        /// Sign in with the demo authenticator after the script runs.
        #[arg(long, value_name = "EMAIL")]
        sign_in: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => StoreConfig::from_json(&read_file(path)?)?,
        None => StoreConfig::default(),
    };

    match cli.command {
        Command::Defaults => print_json(&RootState::default()),
        Command::Replay { script, stored_theme, prefers_dark, sign_in } => {
            let actions: Vec<Action> = serde_json::from_str(&read_file(&script)?)?;
            let report = replay(&config, actions, ReplayOptions { stored_theme, prefers_dark, sign_in }).await?;
            print_json(&report)
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
