//! workshops command line

#![forbid(unsafe_code)]

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{DbCommand, ServeCommand};
use std::path::PathBuf;
use workshops::config::{WorkshopsConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "workshops")]
#[command(version)]
#[command(about = "Run and manage the workshops application", long_about = None)]
struct Cli {
    /// Configuration file; `WORKSHOPS_*` environment variables override it
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve,
    /// Database management commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Run pending migrations
    Migrate,
    /// Recreate the demo user and insert the demo workshops
    Seed,
    /// Drop every table, migrate and seed again
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    workshops::observability::init()?;

    let config = WorkshopsConfig::load_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Serve => ServeCommand::new(config).execute().await?,
        Commands::Db { command } => {
            let db_cmd = match command {
                DbCommands::Migrate => DbCommand::Migrate,
                DbCommands::Seed => DbCommand::Seed,
                DbCommands::Reset { yes } => DbCommand::Reset { confirmed: yes },
            };
            db_cmd.execute(&config).await?;
        }
    }

    Ok(())
}
