mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calboard")]
#[command(about = "Browse public holidays alongside your own events, and edit yours")]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show holidays and your events
    List {
        /// Only show events whose title contains this text
        #[arg(short, long)]
        filter: Option<String>,

        /// Skip fetching holidays
        #[arg(long)]
        offline: bool,
    },
    /// Create an event
    Add {
        title: String,

        /// Start date/time (e.g., "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time (e.g., "2025-03-20T16:00")
        #[arg(short, long)]
        end: String,
    },
    /// Change one of your events
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        #[arg(short, long)]
        end: Option<String>,
    },
    /// Delete one of your events
    Delete {
        id: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show config and data paths, or change holiday settings
    Config {
        /// Holiday provider API key
        #[arg(long)]
        api_key: Option<String>,

        /// Country code for holidays (e.g., "IN", "US")
        #[arg(long)]
        country: Option<String>,

        /// Year to fetch holidays for
        #[arg(long)]
        year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    match cli.command {
        Commands::List { filter, offline } => commands::list::run(filter, offline).await,
        Commands::Add { title, start, end } => commands::add::run(title, start, end),
        Commands::Edit {
            id,
            title,
            start,
            end,
        } => commands::edit::run(&id, title, start, end),
        Commands::Delete { id, force } => commands::delete::run(&id, force),
        Commands::Config {
            api_key,
            country,
            year,
        } => commands::config::run(api_key, country, year),
    }
}
