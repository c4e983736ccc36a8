use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use whale_indexer::application;
use whale_indexer::config::AppConfig;
use whale_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use whale_indexer::utils::logging;

/// Track top holders of BTC, ETH and stable coins and report cohort flows
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json")]
    config: String,

    /// Scrape and store fresh snapshots before reporting
    #[arg(long)]
    update: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_logger();
    let started = Instant::now();
    let args = Args::parse();

    let config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            logging::log_error(&format!("{}", e));
            return ExitCode::FAILURE;
        }
    };

    let db_pool = match DbPool::new(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            logging::log_error(&format!("{}", e));
            return ExitCode::FAILURE;
        }
    };
    let store = RepositoryFactory::create_snapshot_store(&db_pool);

    let outcome = application::run(&config, store, args.update).await;
    logging::log_info(&format!(
        "Execution took {} seconds",
        started.elapsed().as_secs()
    ));

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::log_error(&format!("{}", e));
            ExitCode::FAILURE
        }
    }
}
