//! CLI administration tool for seqlink.
//!
//! Inspects the store directly, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin seqlink-admin -- db check
//!
//! # Apply migrations
//! cargo run --bin seqlink-admin -- db migrate --yes
//!
//! # Show the allocation counter
//! cargo run --bin seqlink-admin -- counter show
//!
//! # Inspect a mapping (does not count as a click)
//! cargo run --bin seqlink-admin -- mapping lookup 1c
//!
//! # Offline helpers
//! cargo run --bin seqlink-admin -- encode 62
//! cargo run --bin seqlink-admin -- decode 10
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `DATABASE_URL` (or the `DB_*` components) is required
//! for every command except `encode` and `decode`.

use seqlink::config::Config;
use seqlink::domain::entities::Mapping;
use seqlink::domain::repositories::MappingRepository;
use seqlink::infrastructure::persistence::{PgCounterRepository, PgMappingRepository};
use seqlink::server;
use seqlink::utils::base62;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing seqlink.
#[derive(Parser)]
#[command(name = "seqlink-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Inspect the allocation counter
    Counter {
        #[command(subcommand)]
        action: CounterAction,
    },

    /// Inspect stored mappings
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },

    /// Print the short code for a sequence number
    Encode { id: u64 },

    /// Print the sequence number behind a short code
    Decode { code: String },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CounterAction {
    /// Show the current counter value
    Show {
        /// Counter name (defaults to COUNTER_NAME)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// Show the mapping behind a short code
    Lookup { code: String },

    /// List the most clicked mappings
    Top {
        #[arg(short, long, default_value_t = 10)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Encode { id } => {
            println!("{}", base62::encode(id).bright_green().bold());
            return Ok(());
        }
        Commands::Decode { code } => {
            let id = base62::decode(&code)
                .with_context(|| format!("'{code}' is not a valid short code"))?;
            println!("{}", id.to_string().bright_green().bold());
            return Ok(());
        }
        command => command,
    };

    let config = Config::from_env()?;
    let pool = server::connect_pool(&config).await?;

    match command {
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Counter { action } => handle_counter_action(action, &config, pool).await?,
        Commands::Mapping { action } => handle_mapping_action(action, pool).await?,
        Commands::Encode { .. } | Commands::Decode { .. } => {}
    }

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate { yes } => {
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Apply pending migrations?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            server::run_migrations(pool).await?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

async fn handle_counter_action(action: CounterAction, config: &Config, pool: PgPool) -> Result<()> {
    let repo = PgCounterRepository::new(Arc::new(pool));

    match action {
        CounterAction::Show { name } => {
            let name = name.unwrap_or_else(|| config.counter_name.clone());
            let current = repo
                .current(&name)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read counter: {}", e))?;

            match current {
                Some(seq) => {
                    println!("  Counter: {}", name.cyan());
                    println!("  Value:   {}", seq.to_string().bright_green().bold());
                    println!("  Latest:  {}", base62::encode(seq).bright_yellow());
                }
                None => {
                    println!("{}", format!("  Counter '{name}' has not been used yet").yellow())
                }
            }
        }
    }

    Ok(())
}

async fn handle_mapping_action(action: MappingAction, pool: PgPool) -> Result<()> {
    let repo = PgMappingRepository::new(Arc::new(pool));

    match action {
        MappingAction::Lookup { code } => {
            if !base62::is_valid_code(&code) {
                anyhow::bail!("'{code}' is not a valid short code");
            }

            let mapping = repo
                .find_by_code(&code)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .with_context(|| format!("No mapping for code '{code}'"))?;

            print_mapping(&mapping);
        }
        MappingAction::Top { limit } => {
            println!("{}", "📊 Most clicked".bright_blue().bold());
            println!();

            let total = repo
                .count()
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
            let mappings = repo
                .top_by_clicks(limit.max(1))
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

            if mappings.is_empty() {
                println!("{}", "  No mappings found".yellow());
                return Ok(());
            }

            println!(
                "  {:<12} {:<10} {}",
                "Code".bright_white().bold(),
                "Clicks".bright_white().bold(),
                "Original URL".bright_white().bold()
            );
            println!("  {}", "─".repeat(75).bright_black());

            for mapping in &mappings {
                println!(
                    "  {:<12} {:<10} {}",
                    mapping.code.cyan(),
                    mapping.clicks.to_string().bright_green(),
                    mapping.original_url
                );
            }

            println!();
            println!("  Total mappings: {}", total.to_string().bright_white().bold());
            println!();
        }
    }

    Ok(())
}

fn print_mapping(mapping: &Mapping) {
    println!("  Code:      {}", mapping.code.cyan());
    println!("  Id:        {}", mapping.id.to_string().bright_black());
    println!("  Original:  {}", mapping.original_url);
    println!("  Short:     {}", mapping.short_url.bright_yellow());
    println!("  Clicks:    {}", mapping.clicks.to_string().bright_green());
    println!(
        "  Created:   {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
}
