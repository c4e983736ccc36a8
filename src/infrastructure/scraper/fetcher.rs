use std::sync::Arc;
use std::time::Duration;

use super::error::ScrapeError;
use super::retry::{Attempt, RetryHandler};
use super::sources::HolderSource;
use super::transport::PageTransport;
use crate::domain::models::WalletObservation;
use crate::utils::logging;

/// Fetches holder pages one at a time with a politeness delay and bounded retries
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn PageTransport>,
    retry: RetryHandler,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn PageTransport>, max_retries: u32, page_delay: Duration) -> Self {
        Self {
            transport,
            retry: RetryHandler::new(max_retries, page_delay),
        }
    }

    /// Fetch one page of positive-balance observations.
    ///
    /// Transport, status and markup failures are retried; so are pages with fewer
    /// rows than the source's page size, but once the budget is spent the short page
    /// is returned instead of failing the run.
    pub async fn fetch_page(
        &self,
        source: &dyn HolderSource,
        page: u32,
    ) -> Result<Vec<WalletObservation>, ScrapeError> {
        let url = source.page_url(page);
        let transport = self.transport.as_ref();
        let target = url.as_str();
        let expected = source.expected_page_size();

        let wallets = self
            .retry
            .execute(target, move || async move {
                let body = match transport.get(target).await {
                    Ok(body) => body,
                    Err(e) => return Attempt::Failed(e),
                };
                let mut wallets = match source.parse_page(&body) {
                    Ok(wallets) => wallets,
                    Err(e) => return Attempt::Failed(e),
                };
                wallets.retain(WalletObservation::has_positive_balance);

                if wallets.len() < expected {
                    let reason = ScrapeError::Incomplete {
                        got: wallets.len(),
                        expected,
                    };
                    Attempt::Incomplete(wallets, reason)
                } else {
                    Attempt::Complete(wallets)
                }
            })
            .await?;

        logging::log_debug(&format!(
            "[{}] {} -> {} holders",
            source.symbol(),
            url,
            wallets.len()
        ));
        Ok(wallets)
    }

    /// Fetch every page of a source in order; pages are never fetched in parallel
    pub async fn fetch_all(
        &self,
        source: &dyn HolderSource,
    ) -> Result<Vec<WalletObservation>, ScrapeError> {
        let mut wallets = Vec::new();
        for page in 1..=source.page_count() {
            let page_wallets = self.fetch_page(source, page).await?;
            wallets.extend(page_wallets);
        }
        Ok(wallets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Chain, WalletObservation};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Source whose "html" is `address:balance` pairs separated by spaces
    struct PlainSource {
        expected: usize,
    }

    impl HolderSource for PlainSource {
        fn chain(&self) -> Chain {
            Chain::Bitcoin
        }
        fn symbol(&self) -> &str {
            "BTC"
        }
        fn page_count(&self) -> u32 {
            2
        }
        fn expected_page_size(&self) -> usize {
            self.expected
        }
        fn page_url(&self, page: u32) -> String {
            format!("plain://{}", page)
        }
        fn parse_page(&self, html: &str) -> Result<Vec<WalletObservation>, ScrapeError> {
            html.split_whitespace()
                .map(|pair| {
                    let (address, balance) = pair
                        .split_once(':')
                        .ok_or_else(|| ScrapeError::SourceFormat(pair.to_string()))?;
                    let balance = balance
                        .parse()
                        .map_err(|_| ScrapeError::SourceFormat(pair.to_string()))?;
                    Ok(WalletObservation::new(Chain::Bitcoin, "BTC", address, None, balance, false))
                })
                .collect()
        }
    }

    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<String, ScrapeError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String, ScrapeError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PageTransport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<String, ScrapeError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(ScrapeError::Status(404)))
        }
    }

    #[tokio::test]
    async fn test_drops_non_positive_balances() {
        let transport = ScriptedTransport::new(vec![Ok("a:5 b:0 c:-1 d:2".into())]);
        let fetcher = PageFetcher::new(transport.clone(), 0, Duration::ZERO);

        let wallets = fetcher.fetch_page(&PlainSource { expected: 2 }, 1).await.unwrap();
        let addresses: Vec<_> = wallets.iter().map(|w| w.address.as_str()).collect();
        assert_eq!(addresses, vec!["a", "d"]);
    }

    #[tokio::test]
    async fn test_short_page_is_retried_then_accepted() {
        let transport = ScriptedTransport::new(vec![
            Ok("a:1".into()),
            Ok("a:1 b:2".into()),
            Ok("a:1 b:2 c:3".into()),
        ]);
        let fetcher = PageFetcher::new(transport.clone(), 2, Duration::ZERO);

        let wallets = fetcher.fetch_page(&PlainSource { expected: 5 }, 1).await.unwrap();
        assert_eq!(wallets.len(), 3);
        assert_eq!(transport.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_full_page_after_transient_errors() {
        let transport = ScriptedTransport::new(vec![
            Err(ScrapeError::Status(503)),
            Ok("garbage".into()),
            Ok("a:1 b:2".into()),
        ]);
        let fetcher = PageFetcher::new(transport.clone(), 5, Duration::ZERO);

        let wallets = fetcher.fetch_page(&PlainSource { expected: 2 }, 1).await.unwrap();
        assert_eq!(wallets.len(), 2);
        assert_eq!(transport.requested.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_page_fails_run() {
        let transport = ScriptedTransport::new(vec![Ok("a:1 b:1".into())]);
        let fetcher = PageFetcher::new(transport.clone(), 1, Duration::ZERO);

        let result = fetcher.fetch_all(&PlainSource { expected: 2 }).await;
        assert!(matches!(
            result,
            Err(ScrapeError::RetriesExhausted { attempts: 2, .. })
        ));
        let requested = transport.requested.lock().unwrap().clone();
        assert_eq!(requested, vec!["plain://1", "plain://2", "plain://2"]);
    }
}
