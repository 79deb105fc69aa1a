//! Aurora Skies FAQ assistant CLI
//!
//! Main entry point for the `aurora` command-line tool.
//! Answers airline policy questions from the FAQ corpus, citing the records
//! each answer comes from.

mod commands;

use aurora_core::{config::AppConfig, logging, AppResult, ConfigOverrides};
use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, CorpusCommand, SearchCommand};
use std::path::PathBuf;

/// Aurora Skies FAQ assistant - grounded answers to airline policy questions
#[derive(Parser, Debug)]
#[command(name = "aurora")]
#[command(about = "Grounded answers to Aurora Skies policy questions", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "AURORA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file (default: <workspace>/.aurora/config.yaml)
    #[arg(short, long, global = true, env = "AURORA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level or filter (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// LLM provider (groq, openai, ollama, mock)
    #[arg(short, long, global = true, env = "AURORA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "AURORA_MODEL")]
    model: Option<String>,

    /// Provider base URL
    #[arg(long, global = true, env = "AURORA_ENDPOINT")]
    endpoint: Option<String>,

    /// Maximum passages retrieved per question
    #[arg(short = 'k', long, global = true, env = "AURORA_TOP_K")]
    top_k: Option<usize>,

    /// Minimum cosine similarity for a passage to be used
    #[arg(long, global = true, env = "AURORA_MIN_SCORE")]
    min_score: Option<f32>,

    /// FAQ CSV file (default: <workspace>/airline_faq.csv)
    #[arg(long, global = true, env = "AURORA_CORPUS")]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a single question
    Ask(AskCommand),

    /// Interactive question-answering session
    Chat(ChatCommand),

    /// Show the passages retrieved for a query, without generating
    Search(SearchCommand),

    /// List the loaded FAQ records
    Corpus(CorpusCommand),
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            top_k: self.top_k,
            min_score: self.min_score,
            corpus: self.corpus.clone(),
            log_level: self.log_level.clone(),
            verbose: self.verbose,
            no_color: self.no_color,
            log_json: self.log_json,
        }
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Defaults, config file, then environment; CLI flags win
    let config =
        AppConfig::load(cli.workspace.clone(), cli.config.clone())?.with_overrides(cli.overrides());

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)?;

    tracing::info!("Aurora CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Chat(_) => "chat",
        Commands::Search(_) => "search",
        Commands::Corpus(_) => "corpus",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config),
        Commands::Corpus(cmd) => cmd.execute(&config),
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
