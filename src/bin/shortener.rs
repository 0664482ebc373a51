//! Command line front end for entity-shortener.
//!
//! # Usage
//!
//! ```bash
//! # Generate (and optionally save) a slug
//! cargo run --bin shortener -- generate product 42 --save
//! cargo run --bin shortener -- generate promo 7 --pattern "summer-sale-{publicId}" --public-id WEEKEND2024
//!
//! # Resolve a slug, counting a click
//! cargo run --bin shortener -- resolve product X7gT5p --click
//!
//! # Offline helpers
//! cargo run --bin shortener -- validate X7gT5p
//! cargo run --bin shortener -- derive "Product Name With Spaces!"
//!
//! # Create many links from a JSON-lines file
//! cargo run --bin shortener -- batch links.jsonl
//!
//! # Check the storage backend
//! cargo run --bin shortener -- db check
//! ```
//!
//! Configuration comes from the environment (and `.env`), see
//! [`entity_shortener::config`].

use entity_shortener::config::{self, Config, StorageBackend};
use entity_shortener::prelude::*;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shortener")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a slug for an entity
    Generate {
        entity_type: String,
        entity_id: String,

        /// Random code length
        #[arg(short, long)]
        length: Option<usize>,

        /// URL template with one placeholder, e.g. "sale-{publicId}"
        #[arg(short, long)]
        pattern: Option<String>,

        /// Caller-chosen public id
        #[arg(long)]
        public_id: Option<String>,

        /// Keep the public id out of the slug
        #[arg(long)]
        exclude_public_id: bool,

        /// Put the entity type in the URL path
        #[arg(long)]
        include_type: bool,

        /// Derive a readable slug from the entity id
        #[arg(long)]
        framework: bool,

        /// Destination the short link forwards to
        #[arg(short, long)]
        target_url: Option<String>,

        /// Persist the link
        #[arg(short, long)]
        save: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve a slug back to its entity
    Resolve {
        entity_type: String,
        slug: String,

        /// Count a click for the slug
        #[arg(long)]
        click: bool,
    },

    /// Show click analytics for a slug
    Analytics { entity_type: String, slug: String },

    /// Check a slug against the format rules
    Validate {
        slug: String,

        #[arg(short, long)]
        length: Option<usize>,

        /// Use readable slug rules
        #[arg(long)]
        framework: bool,
    },

    /// Show the readable slug derived from an entity id
    Derive { entity_id: String },

    /// Create links for every line of a JSON-lines file
    Batch {
        file: PathBuf,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Print every result as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Storage backend operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check the storage connection and prepare the schema
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Validate {
            slug,
            length,
            framework,
        } => {
            let mode = if framework {
                SlugMode::Framework
            } else {
                config.mode
            };
            print_validation(&slug, length.unwrap_or(config.id_length), mode);
            Ok(())
        }
        Commands::Derive { entity_id } => {
            let slug = derive_slug(&entity_id);
            if slug.is_empty() {
                println!("{}", "❌ No usable characters in entity id".red());
            } else {
                println!("{}", slug.bright_green().bold());
            }
            Ok(())
        }
        command => {
            config.print_summary();
            run_with_storage(command, &config).await
        }
    }
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

async fn run_with_storage(command: Commands, config: &Config) -> Result<()> {
    let settings = config.shortener_settings();

    match config.storage_backend {
        StorageBackend::Memory => {
            let storage = Arc::new(InMemoryStorage::new());
            run(command, EntityShortener::new(storage, settings)).await
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let options = PgStorageOptions {
                max_connections: config.db_max_connections,
                connect_timeout: Duration::from_secs(config.db_connect_timeout),
            };
            let storage = Arc::new(
                PgStorage::connect(database_url, options)
                    .await
                    .context("Failed to connect to database")?,
            );
            run(command, EntityShortener::new(storage, settings)).await
        }
        StorageBackend::Redis => {
            let redis_url = config.redis_url.as_deref().context("REDIS_URL must be set")?;
            let storage = Arc::new(
                RedisStorage::connect(redis_url)
                    .await
                    .context("Failed to connect to Redis")?,
            );
            run(command, EntityShortener::new(storage, settings)).await
        }
    }
}

async fn run<S: StorageAdapter>(command: Commands, shortener: EntityShortener<S>) -> Result<()> {
    shortener
        .initialize()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    match command {
        Commands::Generate {
            entity_type,
            entity_id,
            length,
            pattern,
            public_id,
            exclude_public_id,
            include_type,
            framework,
            target_url,
            save,
            json,
        } => {
            let mut options = GenerateOptions::new();
            options.id_length = length;
            options.pattern = pattern;
            options.public_id = public_id;
            options.target_url = target_url;
            if exclude_public_id {
                options.include_in_slug = Some(false);
            }
            if include_type {
                options.include_entity_type_in_path = Some(true);
            }
            if framework {
                options.shortening = Some(false);
            }

            let result = if save {
                shortener.create(&entity_type, &entity_id, options).await
            } else {
                shortener.generate(&entity_type, &entity_id, options).await
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_generation(&result);
            }
        }
        Commands::Resolve {
            entity_type,
            slug,
            click,
        } => {
            let result = shortener.resolve(&entity_type, &slug).await;
            print_resolution(&result);

            if click && result.success {
                let clicks = shortener
                    .track_click(&entity_type, &slug)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to count click: {}", e))?;
                println!("  Clicks: {}", clicks.to_string().bright_green().bold());
            }
        }
        Commands::Analytics { entity_type, slug } => {
            let analytics = shortener
                .analytics(&entity_type, &slug)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to load analytics: {}", e))?;

            match analytics {
                Some(analytics) => print_analytics(&analytics),
                None => println!("{}", "  Slug not found".yellow()),
            }
        }
        Commands::Batch { file, yes, json } => {
            run_batch(&shortener, file, yes, json).await?;
        }
        Commands::Db {
            action: DbAction::Check,
        } => {
            println!("{}", "🔍 Checking storage connection...".bright_blue());

            if shortener.health_check().await {
                println!("{}", "✅ Storage connection OK".green().bold());
            } else {
                anyhow::bail!("Storage health check failed");
            }
        }
        Commands::Validate { .. } | Commands::Derive { .. } => {}
    }

    shortener
        .close()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to close storage: {}", e))?;

    Ok(())
}

/// Reads a JSON-lines file, confirms, and creates every item.
///
/// Blank lines and lines starting with `#` are skipped. A line that does not
/// parse aborts before anything is created.
async fn run_batch<S: StorageAdapter>(
    shortener: &EntityShortener<S>,
    file: PathBuf,
    skip_confirm: bool,
    json: bool,
) -> Result<()> {
    let content = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let items = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .map(|(n, line)| {
            serde_json::from_str::<BatchItem>(line)
                .with_context(|| format!("Line {}: invalid batch item", n + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    println!("{}", "📦 Batch create".bright_blue().bold());
    println!();
    println!("  File:  {}", file.display().to_string().cyan());
    println!("  Items: {}", items.len().to_string().bright_white().bold());
    println!();

    if items.is_empty() {
        println!("{}", "  Nothing to do".yellow());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create {} links?", items.len()))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let results = shortener.create_batch(items).await;

    for result in &results {
        if json {
            println!("{}", serde_json::to_string(result)?);
        } else {
            print_batch_line(result);
        }
    }

    let summary = BatchSummary::from_results(&results);
    println!();
    println!("  Total:     {}", summary.total.to_string().bright_white().bold());
    println!("  Created:   {}", summary.succeeded.to_string().green().bold());
    println!("  Failed:    {}", summary.failed.to_string().red().bold());
    if summary.degraded > 0 {
        println!(
            "  Unchecked: {} {}",
            summary.degraded.to_string().yellow().bold(),
            "(collision check unavailable)".bright_black()
        );
    }
    println!();

    Ok(())
}

fn print_generation(result: &GenerationResult) {
    if !result.success {
        print_error(result.error.as_ref());
        return;
    }

    println!("{}", "✅ Slug generated".green().bold());
    println!("  Slug:      {}", result.slug.bright_yellow().bold());
    if let Some(url) = &result.url {
        println!("  URL:       {}", url.cyan());
    }
    if let Some(public_id) = &result.public_id
        && public_id != &result.slug
    {
        println!("  Public id: {}", public_id.bright_white());
    }
    if let Some(target_url) = &result.target_url {
        println!("  Target:    {}", target_url.bright_black());
    }
    if result.collision_check_skipped {
        println!(
            "{}",
            "⚠️  Collision check was unavailable, uniqueness not verified".yellow()
        );
    }
}

fn print_resolution(result: &ResolutionResult) {
    let Some(entity) = result.entity.as_ref().filter(|_| result.success) else {
        print_error(result.error.as_ref());
        return;
    };

    let source = if result.from_cache { "cache" } else { "storage" };
    println!("{} {}", "✅ Resolved".green().bold(), format!("({source})").bright_black());
    println!("  Entity type: {}", entity.entity_type.cyan());
    println!("  Entity id:   {}", entity.entity_id.bright_yellow().bold());
    if !entity.data.is_null() {
        println!("  Data:        {}", entity.data.to_string().bright_black());
    }
}

fn print_analytics(analytics: &LinkAnalytics) {
    println!("{}", "📊 Analytics".bright_blue().bold());
    println!("  Slug:         {}", analytics.slug.bright_yellow());
    println!("  Entity:       {} {}", analytics.entity_type.cyan(), analytics.entity_id);
    println!(
        "  Clicks:       {}",
        analytics.clicks.to_string().bright_green().bold()
    );
    println!(
        "  Created:      {}",
        analytics.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
    );
    if let Some(last) = analytics.last_clicked_at {
        println!(
            "  Last clicked: {}",
            last.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
}

fn print_validation(slug: &str, length: usize, mode: SlugMode) {
    if is_valid_slug(slug, length, mode) {
        println!("{} {}", "✅ Valid".green().bold(), format!("({mode:?})").bright_black());
    } else {
        println!("{} {}", "❌ Invalid".red().bold(), format!("({mode:?})").bright_black());
    }
}

fn print_batch_line(result: &GenerationResult) {
    let entity = format!("{}:{}", result.entity_type, result.entity_id);

    if result.success {
        println!(
            "  {} {:<30} {}",
            "✓".green(),
            entity.cyan(),
            result.url.as_deref().unwrap_or_default()
        );
    } else {
        let message = result.error.as_ref().map(|e| e.message.as_str()).unwrap_or_default();
        println!("  {} {:<30} {}", "✗".red(), entity.cyan(), message.red());
    }
}

fn print_error(error: Option<&ErrorInfo>) {
    match error {
        Some(error) => println!(
            "{} {} {}",
            "❌".red(),
            error.message.red().bold(),
            format!("[{}]", error.code).bright_black()
        ),
        None => println!("{}", "❌ Failed".red().bold()),
    }
}
