use scraper::Html;

use super::{compact_text, parse_balance, selector, HolderSource};
use crate::domain::models::{Chain, WalletObservation};
use crate::infrastructure::scraper::error::ScrapeError;
use crate::utils::logging;

const BASE_URL: &str = "https://etherscan.io";

/// Ether top accounts table
#[derive(Debug, Clone)]
pub struct EtherscanAccounts {
    base_url: String,
    page_count: u32,
    expected_page_size: usize,
}

impl EtherscanAccounts {
    pub fn new(page_count: u32, expected_page_size: usize) -> Self {
        Self::with_base_url(BASE_URL, page_count, expected_page_size)
    }

    pub fn with_base_url(base_url: &str, page_count: u32, expected_page_size: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            page_count,
            expected_page_size,
        }
    }
}

impl HolderSource for EtherscanAccounts {
    fn chain(&self) -> Chain {
        Chain::Ethereum
    }

    fn symbol(&self) -> &str {
        Chain::Ethereum.symbol()
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn expected_page_size(&self) -> usize {
        self.expected_page_size
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/accounts/{}?ps={}", self.base_url, page, self.expected_page_size)
    }

    fn parse_page(&self, html: &str) -> Result<Vec<WalletObservation>, ScrapeError> {
        let document = Html::parse_document(html);
        let row_selector = selector("tr")?;
        let cell_selector = selector("td")?;

        let mut wallets = Vec::new();
        for row in document.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 4 {
                continue;
            }

            let address = compact_text(&cells[1]);
            if address.is_empty() {
                continue;
            }
            let is_contract = cells[1].inner_html().contains("Contract");
            let label = Some(compact_text(&cells[2]));

            let text = compact_text(&cells[3]);
            let balance = parse_balance(&text.replace("Ether", "")).unwrap_or_else(|| {
                logging::log_debug(&format!(
                    "[ethereum] unreadable balance {:?} for {}",
                    text, address
                ));
                0.0
            });

            wallets.push(WalletObservation::new(
                Chain::Ethereum,
                self.symbol(),
                address,
                label,
                balance,
                is_contract,
            ));
        }

        Ok(wallets)
    }
}
