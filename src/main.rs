//! Review Lens command-line entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use review_lens::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

/// Review Lens: ask questions about customer reviews in plain English
#[derive(Parser, Debug)]
#[command(name = "review-lens")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable JSON logging format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interpret a question without running it
    Parse {
        /// The question, e.g. "What's our sentiment in Westside?"
        query: String,
    },
    /// Interpret a question, run it against review data and format the answer
    Ask {
        /// The question
        query: String,
        /// Persona to format for (executive, analyst, manager, casual)
        #[arg(short, long)]
        persona: Option<String>,
        /// JSON file of review records (overrides the configured data path)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Print interpreter metrics after answering
        #[arg(long)]
        metrics: bool,
    },
    /// Interactive session; each line is a question in one conversation
    Chat {
        /// Persona to format for (executive, analyst, manager, casual)
        #[arg(short, long)]
        persona: Option<String>,
        /// JSON file of review records (overrides the configured data path)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Print interpreter metrics for the session when it ends
        #[arg(long)]
        metrics: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.json_logs);

    let config = if let Some(path) = &args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };

    tracing::debug!(
        context_capacity = config.interpreter.context_capacity,
        confidence_floor = ?config.interpreter.confidence_floor,
        default_persona = %config.formatter.default_persona,
        "Configuration loaded"
    );

    match args.command {
        Command::Parse { query } => cli::run_parse(&config, query, args.json),
        Command::Ask {
            query,
            persona,
            data,
            metrics,
        } => cli::run_ask(&config, query, persona, data, metrics, args.json).await,
        Command::Chat {
            persona,
            data,
            metrics,
        } => cli::run_chat(&config, persona, data, metrics, args.json).await,
    }
}

/// Logs go to stderr so stdout stays clean for answers. `RUST_LOG` overrides
/// the default `warn` level.
fn init_logging(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
