//! Explorer pages listing the top holders of an asset

pub mod bitinfocharts;
pub mod etherscan_accounts;
pub mod etherscan_tokens;

pub use bitinfocharts::BitcoinRichList;
pub use etherscan_accounts::EtherscanAccounts;
pub use etherscan_tokens::EtherscanTokenHolders;

use scraper::{ElementRef, Selector};

use super::error::ScrapeError;
use crate::domain::models::{Chain, WalletObservation};

/// A paginated listing of holders for one asset on one chain
pub trait HolderSource: Send + Sync {
    /// Chain every observation from this source belongs to
    fn chain(&self) -> Chain;

    /// Asset the listed balances are denominated in
    fn symbol(&self) -> &str;

    /// Number of pages fetched per run
    fn page_count(&self) -> u32;

    /// Rows on a full page; fewer means the page is treated as incomplete
    fn expected_page_size(&self) -> usize;

    fn page_url(&self, page: u32) -> String;

    /// Extract holder rows from a page body.
    ///
    /// Rows whose balance cannot be read come back with a zero balance and are
    /// dropped by the fetcher.
    fn parse_page(&self, html: &str) -> Result<Vec<WalletObservation>, ScrapeError>;
}

pub(crate) fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::SourceFormat(format!("invalid selector {}: {:?}", css, e)))
}

/// Cell text with all whitespace removed
pub(crate) fn compact_text(element: &ElementRef) -> String {
    element
        .text()
        .flat_map(|t| t.chars())
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Parse a balance such as `1,234.5 Ether` once the unit has been stripped
pub(crate) fn parse_balance(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}
