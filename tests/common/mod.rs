#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use whale_indexer::infrastructure::scraper::{PageFetcher, PageTransport, ScrapeError};

pub const FIXTURE_URL: &str = "http://fixture.local";

/// Serves whatever body is currently registered for a URL; unknown URLs get a 503
#[derive(Default)]
pub struct FixtureTransport {
    pages: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl FixtureTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn serve(&self, url: &str, body: String) {
        self.pages.lock().unwrap().insert(url.to_string(), body);
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PageTransport for FixtureTransport {
    async fn get(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or(ScrapeError::Status(503))
    }
}

pub fn fetcher(transport: Arc<FixtureTransport>, max_retries: u32) -> PageFetcher {
    PageFetcher::new(transport, max_retries, Duration::ZERO)
}

/// bitinfocharts rich list page; `label` becomes the wallet tag link
pub fn bitcoin_page(rows: &[(&str, Option<&str>, f64)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (address, label, balance))| {
            let tag = label
                .map(|l| format!(r#"<small><a href="/wallet/{0}">{0}</a></small>"#, l))
                .unwrap_or_default();
            format!(
                r#"<tr><td>{}</td><td><a href="/bitcoin/address/{1}">{1}</a>{2}</td><td>{3} BTC ($1)</td></tr>"#,
                i + 1,
                address,
                tag,
                balance
            )
        })
        .collect();
    format!(r#"<html><body><table id="tblOne"><tbody>{}</tbody></table></body></html>"#, body)
}

/// etherscan top accounts page
pub fn ethereum_page(rows: &[(&str, &str, f64)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (address, label, balance))| {
            format!(
                r#"<tr><td>{}</td><td><a href="/address/{1}">{1}</a></td><td>{2}</td><td>{3} Ether</td><td>1%</td></tr>"#,
                i + 1,
                address,
                label,
                balance
            )
        })
        .collect();
    format!("<table><tbody>{}</tbody></table>", body)
}

/// etherscan token holder page; a labelled holder shows its name and links the address
pub fn token_page(token_address: &str, rows: &[(&str, Option<&str>, f64)]) -> String {
    let body: String = rows
        .iter()
        .enumerate()
        .map(|(i, (address, label, balance))| {
            format!(
                r#"<tr><td>{}</td><td><a href="/token/{}?a={}">{}</a></td><td>{}</td><td>1%</td></tr>"#,
                i + 1,
                token_address,
                address,
                label.unwrap_or(*address),
                balance
            )
        })
        .collect();
    format!("<table><tbody>{}</tbody></table>", body)
}
