pub mod ingest;
pub mod report;

use std::sync::Arc;

use chrono::Utc;

use crate::config::AppConfig;
use crate::domain::errors::AppError;
use crate::domain::models::Chain;
use crate::infrastructure::api::{PriceClient, TelegramNotifier};
use crate::infrastructure::persistence::SnapshotStore;
use crate::infrastructure::scraper::{HttpTransport, PageFetcher, ScrapeError};
use crate::utils::logging;
use ingest::{batch_update, ChainIngestor};
use report::{compose_message, write_prices, write_series, SeriesBuilder};

/// One invocation: optionally ingest every chain, then report.
///
/// Price, notification and artifact failures end the invocation but never touch
/// what the ingest step already committed.
pub async fn run(
    config: &AppConfig,
    store: Arc<dyn SnapshotStore>,
    update: bool,
) -> Result<(), AppError> {
    if update {
        logging::log_info("Updating holder snapshots");
        let transport = Arc::new(HttpTransport::new().map_err(scrape_setup_error)?);
        let fetcher = PageFetcher::new(
            transport,
            config.scrape.max_retries,
            config.scrape.page_delay(),
        );
        let ingestors = Chain::ALL
            .into_iter()
            .map(|chain| {
                ChainIngestor::from_config(
                    chain,
                    &config.scrape,
                    &config.tokens,
                    fetcher.clone(),
                    store.clone(),
                )
            })
            .collect();
        batch_update(ingestors).await?;
    }

    let prices = PriceClient::new()?.fetch_prices(&Chain::ALL).await?;

    let points = SeriesBuilder::new(store)
        .with_capture_start(config.capture_start())
        .merged_points(Utc::now())
        .await?;
    logging::log_info(&format!("Built {} hourly points", points.len()));

    write_prices(&config.price_output, &prices)?;

    if let Some(notifier) =
        TelegramNotifier::new(&config.telegram.bot_id, &config.telegram.recipient_id)?
    {
        let message = compose_message(&points, &prices, &config.report_url);
        notifier.send(&message).await?;
        logging::log_info("Report sent");
    }

    if update {
        if let Some(path) = config.output_path() {
            write_series(path, &points)?;
        }
    }

    Ok(())
}

fn scrape_setup_error(e: ScrapeError) -> AppError {
    AppError::Config(format!("could not build HTTP transport: {}", e))
}
