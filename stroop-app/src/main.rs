//! stroop: the color-word interference test as a desktop app and a headless CLI.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod export;
mod form;
mod settings;
mod simulate;

#[derive(Parser)]
#[command(name = "stroop", version, about = "Stroop color-word reaction time test")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session in a window
    Run {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a session with a simulated participant and write the report
    Simulate(commands::simulate::SimulateArgs),

    /// Write a starter config file
    Init {
        /// Where to write it (default: ./stroop.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stroop=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => commands::run::execute(config),
        Commands::Simulate(args) => commands::simulate::execute(args),
        Commands::Init { path } => commands::init::execute(path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
