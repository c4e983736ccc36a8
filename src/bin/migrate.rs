use anyhow::{Context, Result};
use clap::Parser;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use whale_indexer::config::AppConfig;
use whale_indexer::utils::logging;

/// Apply the whale / balance schema
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file holding pg_url; DATABASE_URL takes precedence
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Number of migrations to run (all pending if not specified)
    #[arg(short, long)]
    steps: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logger();
    dotenv::dotenv().ok();

    let args = Args::parse();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            AppConfig::load(&args.config)
                .with_context(|| format!("reading {}", args.config))?
                .database_url
        }
    };

    logging::log_database_connection_details(&database_url);
    let connection = Database::connect(&database_url)
        .await
        .context("connecting to database")?;

    logging::log_info("Running database migrations...");
    Migrator::up(&connection, args.steps)
        .await
        .context("applying migrations")?;
    logging::log_info("Migrations completed successfully!");

    Ok(())
}
