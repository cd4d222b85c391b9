//! CLI administration tool for link-shortener.
//!
//! Provides commands for preparing the store and managing links without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Apply PostgreSQL migrations
//! cargo run --bin admin -- db migrate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Create the DynamoDB table (STORE_BACKEND=dynamodb)
//! cargo run --bin admin -- dynamo create-table
//!
//! # Create, resolve and list links
//! cargo run --bin admin -- link create https://example.com --id docs
//! cargo run --bin admin -- link get docs
//! cargo run --bin admin -- link list
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORE_BACKEND`, `DATABASE_URL` (or `DB_*`),
//! `DYNAMODB_TABLE`, `DYNAMODB_ENDPOINT`, `HASH_LENGTH`, `STORE_TIMEOUT_MS`.

use link_shortener::application::services::LinkService;
use link_shortener::config::{self, Config, StoreBackend};
use link_shortener::domain::entities::Link;
use link_shortener::infrastructure::persistence::DynamoLinkRepository;
use link_shortener::server;
use link_shortener::state::DynLinkService;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// PostgreSQL operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// DynamoDB operations
    Dynamo {
        #[command(subcommand)]
        action: DynamoAction,
    },

    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Apply pending migrations
    Migrate,

    /// Check database connection
    Check,
}

#[derive(Subcommand)]
enum DynamoAction {
    /// Create the links table
    CreateTable {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link
    Create {
        /// Target URL (http or https)
        url: String,

        /// Custom short id (optional, generated if not provided)
        #[arg(short, long)]
        id: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a link by its short id
    Get { id: String },

    /// List the most recent links
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &config).await?,
        Commands::Dynamo { action } => handle_dynamo_action(action, &config).await?,
        Commands::Link { action } => handle_link_action(action, &config).await?,
    }

    Ok(())
}

/// Handles PostgreSQL maintenance commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!(
            "db commands need STORE_BACKEND=postgres (current: {})",
            config.store_backend
        );
    }

    match action {
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            server::connect_postgres(config).await?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = PgPool::connect(database_url)
                .await
                .context("Failed to connect to database")?;

            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}

async fn handle_dynamo_action(action: DynamoAction, config: &Config) -> Result<()> {
    let table = config
        .dynamodb_table
        .as_deref()
        .context("DYNAMODB_TABLE must be set")?;

    match action {
        DynamoAction::CreateTable { yes } => {
            println!("{}", "🗄  Create DynamoDB table".bright_blue().bold());
            println!();
            println!("  Table:    {}", table.cyan());
            if let Some(ref endpoint) = config.dynamodb_endpoint {
                println!("  Endpoint: {}", endpoint.bright_black());
            }
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Create this table?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let repository = DynamoLinkRepository::connect(
                table,
                config.dynamodb_endpoint.as_deref(),
                config.store_timeout(),
            )
            .await;

            repository
                .create_table()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create table: {}", e))?;

            println!("{}", "✅ Table created".green().bold());
        }
    }

    Ok(())
}

/// Dispatches link commands through the same service the HTTP API uses.
async fn handle_link_action(action: LinkAction, config: &Config) -> Result<()> {
    if config.store_backend == StoreBackend::Memory {
        println!(
            "{}",
            "⚠️  STORE_BACKEND=memory: links only live for this command".yellow()
        );
    }

    let repository = server::connect_store(config).await?;
    let service = LinkService::new(repository, config.service_settings());

    match action {
        LinkAction::Create { url, id, yes } => create_link(&service, url, id, yes).await?,
        LinkAction::Get { id } => {
            let link = service
                .get_link(&id)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            print_link(&link);
        }
        LinkAction::List => list_links(&service).await?,
    }

    Ok(())
}

/// Creates a link after showing its details and asking for confirmation.
async fn create_link(
    service: &DynLinkService,
    url: String,
    id: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();
    println!("  URL: {}", url.cyan());
    match id {
        Some(ref id) => println!("  ID:  {}", id.bright_yellow()),
        None => println!("  ID:  {}", "(generated)".bright_black()),
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = service
        .create_link(url, id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    print_link(&link);

    Ok(())
}

/// Lists recent links, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   ID        Created              URL
///   ──────────────────────────────────────────────────────────
///   a1B_      2024-01-15 10:30     https://example.com
/// ```
async fn list_links(
    service: &DynLinkService,
) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let links = service
        .list_links()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<10} {:<20} {}",
        "ID".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<10} {:<20} {}",
            link.hash.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url
        );
    }

    println!();
    println!("  Shown: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    println!("  ID:      {}", link.hash.bright_yellow().bold());
    println!("  URL:     {}", link.url.cyan());
    println!(
        "  Created: {}",
        link.created_at.to_rfc3339().bright_black()
    );
    println!();
}
