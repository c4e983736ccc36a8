use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ScrapeConfig;
use crate::domain::errors::IngestError;
use crate::domain::models::{Chain, TokenContract};
use crate::domain::services::dedupe_run;
use crate::infrastructure::persistence::{RunReceipt, SnapshotStore};
use crate::infrastructure::scraper::{
    BitcoinRichList, EtherscanAccounts, EtherscanTokenHolders, HolderSource, PageFetcher,
};
use crate::utils::logging;

/// Scrapes and stores every holder source of one chain.
///
/// The native asset goes first, then each token contract; each source is one run
/// and one transaction.
pub struct ChainIngestor {
    chain: Chain,
    sources: Vec<Box<dyn HolderSource>>,
    fetcher: PageFetcher,
    store: Arc<dyn SnapshotStore>,
}

impl ChainIngestor {
    pub fn new(chain: Chain, fetcher: PageFetcher, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            chain,
            sources: Vec::new(),
            fetcher,
            store,
        }
    }

    /// The native listing for the chain followed by its configured tokens
    pub fn from_config(
        chain: Chain,
        scrape: &ScrapeConfig,
        tokens: &[TokenContract],
        fetcher: PageFetcher,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let native: Box<dyn HolderSource> = match chain {
            Chain::Bitcoin => Box::new(BitcoinRichList::new(
                scrape.bitcoin_pages,
                scrape.bitcoin_page_size,
            )),
            Chain::Ethereum => Box::new(EtherscanAccounts::new(
                scrape.ethereum_pages,
                scrape.ethereum_page_size,
            )),
        };

        let mut ingestor = Self::new(chain, fetcher, store).with_source(native);
        for token in tokens.iter().filter(|t| t.chain == chain) {
            ingestor = ingestor.with_source(Box::new(EtherscanTokenHolders::new(
                token.clone(),
                scrape.token_pages,
                scrape.token_page_size,
            )));
        }
        ingestor
    }

    pub fn with_source(mut self, source: Box<dyn HolderSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run every source in order; the first failure stops the chain
    pub async fn run(&self) -> Result<Vec<RunReceipt>, IngestError> {
        let mut receipts = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            receipts.push(self.ingest_source(source.as_ref(), Utc::now).await?);
        }
        Ok(receipts)
    }

    /// Fetch all pages of one source, keep the last sighting per address and
    /// commit the result stamped with `clock()` at commit time
    pub async fn ingest_source(
        &self,
        source: &dyn HolderSource,
        clock: impl Fn() -> DateTime<Utc>,
    ) -> Result<RunReceipt, IngestError> {
        logging::log_info(&format!(
            "[{}] scraping {} ({} pages)",
            self.chain,
            source.symbol(),
            source.page_count()
        ));

        let fetched = self
            .fetcher
            .fetch_all(source)
            .await
            .map_err(|e| IngestError::Scrape {
                chain: self.chain,
                source: e,
            })?;
        let fetched_count = fetched.len();
        let observations = dedupe_run(fetched);

        let receipt = self
            .store
            .commit_run(&observations, clock())
            .await
            .map_err(|e| IngestError::Db {
                chain: self.chain,
                source: e,
            })?;

        logging::log_info(&format!(
            "[{}] {} committed: {} identities, {} snapshots ({} duplicates dropped)",
            self.chain,
            source.symbol(),
            receipt.identities,
            receipt.snapshots,
            fetched_count - observations.len()
        ));
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::MemorySnapshotStore;
    use crate::infrastructure::scraper::HttpTransport;
    use std::time::Duration;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Arc::new(HttpTransport::new().unwrap()), 0, Duration::ZERO)
    }

    #[test]
    fn test_from_config_adds_tokens_of_same_chain() {
        let tokens = vec![
            TokenContract {
                symbol: "USDT".into(),
                address: "0xdac17f958d2ee523a2206206994597c13d831ec7".into(),
                chain: Chain::Ethereum,
            },
            TokenContract {
                symbol: "USDC".into(),
                address: "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48".into(),
                chain: Chain::Ethereum,
            },
        ];
        let store = Arc::new(MemorySnapshotStore::new());

        let eth = ChainIngestor::from_config(
            Chain::Ethereum,
            &ScrapeConfig::default(),
            &tokens,
            fetcher(),
            store.clone(),
        );
        assert_eq!(eth.source_count(), 3);
        assert_eq!(eth.sources[0].symbol(), "ETH");
        assert_eq!(eth.sources[2].symbol(), "USDC");

        let btc =
            ChainIngestor::from_config(Chain::Bitcoin, &ScrapeConfig::default(), &tokens, fetcher(), store);
        assert_eq!(btc.source_count(), 1);
        assert_eq!(btc.sources[0].page_count(), 40);
    }
}
