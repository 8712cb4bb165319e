mod config;
mod email;
mod errors;
mod llm_client;
mod pipeline;
mod screening;
mod state;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

/// Structured email triage and CV screening backed by Gemini.
#[derive(Parser)]
#[command(name = "intake")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify pasted emails and draft replies, appending each result to the log
    Classify,

    /// Score every configured CV against the job description
    Screen,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // Load configuration
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Err(AppError::Configuration(format!("{e:#}")));
        }
    };

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting intake v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(config)?;
    info!("LLM client initialized (model: {})", state.config.gemini_model);

    match cli.command {
        Commands::Classify => state.email_desk().run_interactive().await,
        Commands::Screen => {
            let summary = match state.screener().run().await {
                Ok(summary) => summary,
                Err(e) => {
                    eprintln!("Error: {e}. Stopping.");
                    return Err(e);
                }
            };
            println!(
                "\nScreening complete: {summary}. Results are in '{}'.",
                state.config.output_dir.display()
            );
            Ok(())
        }
    }
}
