//! Copymill CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a starter config file
//! - `generate` — Run the three-stage pipeline for a business
//! - `history`  — List, show, search, or delete saved runs

use clap::{Parser, Subcommand};
use copymill_core::Channel;

mod commands;

#[derive(Parser)]
#[command(
    name = "copymill",
    about = "Copymill — AI marketing copy pipeline",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file to ~/.copymill/config.toml
    Init,

    /// Generate marketing copy for a business
    Generate {
        /// Business name
        #[arg(long)]
        business: String,

        /// Key features, comma-separated prose
        #[arg(long)]
        features: String,

        /// Target customer description
        #[arg(long)]
        customer: String,

        /// Marketing channel: instagram, blog, or email
        #[arg(long)]
        channel: Channel,

        /// Desired tone of voice
        #[arg(long, default_value = "friendly")]
        tone: String,

        /// Skip retrieval even when the config enables it
        #[arg(long)]
        no_rag: bool,

        /// Print intermediate stage outputs, not just the final copy
        #[arg(long)]
        show_stages: bool,
    },

    /// Inspect saved runs
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List saved runs, newest first
    List {
        /// Maximum number of runs to show
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show one saved run in full
    Show { id: i64 },

    /// Search saved runs by business name
    Search { name: String },

    /// Delete one saved run
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Generate {
            business,
            features,
            customer,
            channel,
            tone,
            no_rag,
            show_stages,
        } => {
            commands::generate::run(commands::generate::GenerateArgs {
                business,
                features,
                customer,
                channel,
                tone,
                no_rag,
                show_stages,
            })
            .await?
        }
        Commands::History { command } => match command {
            HistoryCommands::List { limit } => commands::history::list(limit).await?,
            HistoryCommands::Show { id } => commands::history::show(id).await?,
            HistoryCommands::Search { name } => commands::history::search(&name).await?,
            HistoryCommands::Delete { id } => commands::history::delete(id).await?,
        },
    }

    Ok(())
}
