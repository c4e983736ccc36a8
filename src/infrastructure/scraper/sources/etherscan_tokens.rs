use scraper::{ElementRef, Html};

use super::{compact_text, parse_balance, selector, HolderSource};
use crate::domain::models::{Chain, TokenContract, WalletObservation};
use crate::infrastructure::scraper::error::ScrapeError;
use crate::utils::logging;

const BASE_URL: &str = "https://etherscan.io";

/// Holder table of one ERC-20 token contract
#[derive(Debug, Clone)]
pub struct EtherscanTokenHolders {
    token: TokenContract,
    base_url: String,
    page_count: u32,
    expected_page_size: usize,
}

impl EtherscanTokenHolders {
    pub fn new(token: TokenContract, page_count: u32, expected_page_size: usize) -> Self {
        Self::with_base_url(token, BASE_URL, page_count, expected_page_size)
    }

    pub fn with_base_url(
        token: TokenContract,
        base_url: &str,
        page_count: u32,
        expected_page_size: usize,
    ) -> Self {
        Self {
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_count,
            expected_page_size,
        }
    }

    pub fn token(&self) -> &TokenContract {
        &self.token
    }

    /// Labelled holders only show their name; the address sits in the link query
    fn linked_address(&self, cell: &ElementRef) -> Option<String> {
        let link_selector = selector("a[href]").ok()?;
        cell.select(&link_selector)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| {
                let (_, query) = href.split_once("?a=")?;
                let address = query.split(['&', '"', ' ']).next()?;
                (!address.is_empty()).then(|| address.to_string())
            })
    }
}

impl HolderSource for EtherscanTokenHolders {
    fn chain(&self) -> Chain {
        self.token.chain
    }

    fn symbol(&self) -> &str {
        &self.token.symbol
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn expected_page_size(&self) -> usize {
        self.expected_page_size
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/token/generic-tokenholders2?a={}&p={}",
            self.base_url, self.token.address, page
        )
    }

    fn parse_page(&self, html: &str) -> Result<Vec<WalletObservation>, ScrapeError> {
        let document = Html::parse_document(html);
        let row_selector = selector("tr")?;
        let cell_selector = selector("td")?;

        let mut wallets = Vec::new();
        for row in document.select(&row_selector) {
            let cells: Vec<_> = row.select(&cell_selector).collect();
            if cells.len() < 3 {
                continue;
            }

            let holder = compact_text(&cells[1]);
            let is_contract = cells[1].inner_html().contains("Contract");
            let (address, label) = if holder.starts_with("0x") {
                (holder, None)
            } else {
                match self.linked_address(&cells[1]) {
                    Some(address) => (address, Some(holder)),
                    None => {
                        return Err(ScrapeError::SourceFormat(format!(
                            "[{}] holder {:?} has no address link",
                            self.token.symbol, holder
                        )))
                    }
                }
            };

            let text = compact_text(&cells[2]);
            let balance = parse_balance(&text).unwrap_or_else(|| {
                logging::log_debug(&format!(
                    "[{}] unreadable balance {:?} for {}",
                    self.token.symbol, text, address
                ));
                0.0
            });

            wallets.push(WalletObservation::new(
                self.token.chain,
                self.token.symbol.clone(),
                address,
                label,
                balance,
                is_contract,
            ));
        }

        Ok(wallets)
    }
}
