use scraper::Html;

use super::{compact_text, parse_balance, selector, HolderSource};
use crate::domain::models::{Chain, WalletObservation};
use crate::infrastructure::scraper::error::ScrapeError;
use crate::utils::logging;

const BASE_URL: &str = "https://bitinfocharts.com";
const TABLES: [&str; 2] = ["#tblOne", "#tblOne2"];

/// Bitcoin rich list split over two tables per page
#[derive(Debug, Clone)]
pub struct BitcoinRichList {
    base_url: String,
    page_count: u32,
    expected_page_size: usize,
}

impl BitcoinRichList {
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

impl HolderSource for BitcoinRichList {
    fn chain(&self) -> Chain {
        Chain::Bitcoin
    }

    fn symbol(&self) -> &str {
        Chain::Bitcoin.symbol()
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn expected_page_size(&self) -> usize {
        self.expected_page_size
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/top-100-richest-bitcoin-addresses-{}.html", self.base_url, page)
    }

    fn parse_page(&self, html: &str) -> Result<Vec<WalletObservation>, ScrapeError> {
        let document = Html::parse_document(html);
        let row_selector = selector("tr")?;
        let cell_selector = selector("td")?;
        let link_selector = selector("a")?;

        let mut wallets = Vec::new();
        for table_css in TABLES {
            let table_selector = selector(table_css)?;
            for table in document.select(&table_selector) {
                for row in table.select(&row_selector) {
                    let cells: Vec<_> = row.select(&cell_selector).collect();
                    if cells.len() < 3 {
                        continue;
                    }

                    // First link is the address, an optional second one the owner tag
                    let mut links = cells[1].select(&link_selector).map(|a| compact_text(&a));
                    let Some(address) = links.next().filter(|a| !a.is_empty()) else {
                        continue;
                    };
                    let label = links.next().filter(|l| !l.is_empty());

                    let text = compact_text(&cells[2]);
                    let amount = text.split("BTC").next().unwrap_or_default();
                    let balance = parse_balance(amount).unwrap_or_else(|| {
                        logging::log_debug(&format!(
                            "[bitcoin] unreadable balance {:?} for {}",
                            text, address
                        ));
                        0.0
                    });

                    wallets.push(WalletObservation::new(
                        Chain::Bitcoin,
                        self.symbol(),
                        address,
                        label,
                        balance,
                        false,
                    ));
                }
            }
        }

        Ok(wallets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OwnerType;

    const PAGE: &str = r#"
        <html><body>
        <table id="tblOne"><tbody>
          <tr><th>#</th><th>Address</th><th>Balance</th></tr>
          <tr>
            <td>1</td>
            <td><a href="/bitcoin/address/34xp4">34xp4vRoCGJym3xR7yCVPFHoCNxv4Twseo</a>
                <small><a href="/wallet/binance">wallet: Binance-coldwallet</a></small></td>
            <td>248,597 BTC ($10,000,000,000)</td>
          </tr>
        </tbody></table>
        <table id="tblOne2"><tbody>
          <tr>
            <td>2</td>
            <td><a href="/bitcoin/address/bc1qgd">bc1qgdjqv0av3q56jvd82tkdjpy7gdp9ut8tlqmgrpmv24sq90ecnvqqjwvw97</a></td>
            <td>168,010.5 BTC ($7,000,000,000)</td>
          </tr>
          <tr>
            <td>3</td>
            <td><a href="/bitcoin/address/1P5Z">1P5ZEDWTKTFGxQjZphgWPQUpe554WKDfHQ</a></td>
            <td>n/a</td>
          </tr>
        </tbody></table>
        </body></html>
    "#;

    #[test]
    fn test_parse_both_tables() {
        let source = BitcoinRichList::new(40, 100);
        let wallets = source.parse_page(PAGE).unwrap();

        assert_eq!(wallets.len(), 3);

        assert_eq!(wallets[0].address, "34xp4vRoCGJym3xR7yCVPFHoCNxv4Twseo");
        assert_eq!(wallets[0].label.as_deref(), Some("wallet:Binance-coldwallet"));
        assert_eq!(wallets[0].balance, 248_597.0);
        assert_eq!(wallets[0].owner_type, OwnerType::Exchange);

        assert_eq!(wallets[1].balance, 168_010.5);
        assert_eq!(wallets[1].owner_type, OwnerType::Unknown);
        assert!(!wallets[1].is_contract);

        // unreadable balance is kept as zero for the fetcher to drop
        assert_eq!(wallets[2].balance, 0.0);
    }

    #[test]
    fn test_page_url() {
        let source = BitcoinRichList::new(40, 100);
        assert_eq!(
            source.page_url(3),
            "https://bitinfocharts.com/top-100-richest-bitcoin-addresses-3.html"
        );
    }
}
