//! Amity CLI - Command line interface for the friendship network

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use amity_storage::{SocialStore, SqliteStorage};
use commands::{completions, config as config_cmd, friend, graph, io, user};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "amity")]
#[command(author, version, about = "Friendship graph explorer")]
pub struct Cli {
    /// Data directory
    #[arg(short, long, global = true, env = "AMITY_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users
    User(user::UserArgs),
    /// Manage friendships
    Friend(friend::FriendArgs),
    /// Query the friendship graph
    Graph(graph::GraphArgs),
    /// Import users and friendships from a JSON snapshot
    Import(io::ImportArgs),
    /// Export users and friendships as a JSON snapshot
    Export(io::ExportArgs),
    /// Manage configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context with storage backend and resolved settings
pub struct AppContext {
    pub storage: Arc<SqliteStorage>,
    pub format: OutputFormat,
    pub suggest_depth: u32,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: &Config) -> anyhow::Result<Self> {
        let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());
        std::fs::create_dir_all(&data_dir)?;

        let db_path = data_dir.join("amity.db");
        tracing::debug!("Using database at: {:?}", db_path);

        let storage = SqliteStorage::open(&db_path)?;
        storage.initialize().await?;

        Ok(Self {
            storage: Arc::new(storage),
            format: cli.format.unwrap_or_else(|| config.format()),
            suggest_depth: config.suggest_depth(),
        })
    }

    /// Load the config file and open the store it points at
    pub async fn open(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load()?;
        Self::new(cli, &config).await
    }

    pub fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting amity CLI");

    match &cli.command {
        Commands::User(args) => user::run(args, &AppContext::open(&cli).await?).await?,
        Commands::Friend(args) => friend::run(args, &AppContext::open(&cli).await?).await?,
        Commands::Graph(args) => graph::run(args, &AppContext::open(&cli).await?).await?,
        Commands::Import(args) => io::run_import(args, &AppContext::open(&cli).await?).await?,
        Commands::Export(args) => io::run_export(args, &AppContext::open(&cli).await?).await?,
        Commands::Config(args) => config_cmd::run(args)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
