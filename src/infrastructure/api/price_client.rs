use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

use crate::domain::models::{Chain, PricedChain};
use crate::infrastructure::api::error::ApiClientError;
use crate::utils::logging;

const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// `{"bitcoin": {"usd": 43210.0}, ...}`
type PriceReply = HashMap<String, HashMap<String, f64>>;

/// Client for the CoinGecko simple price endpoint
pub struct PriceClient {
    client: Client,
    base_url: String,
}

impl PriceClient {
    pub fn new() -> Result<Self, ApiClientError> {
        Self::with_base_url(COINGECKO_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, ApiClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(PriceClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Current USD price of every chain's native asset, in the order given
    pub async fn fetch_prices(&self, chains: &[Chain]) -> Result<Vec<PricedChain>, ApiClientError> {
        let ids: Vec<&str> = chains.iter().map(Chain::name).collect();
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url,
            ids.join(",")
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiClientError::ApiError {
                endpoint: url,
                status: status.as_u16(),
                body,
            });
        }

        let reply: PriceReply = serde_json::from_str(&response.text().await?)?;
        Ok(prices_from_reply(&reply, chains))
    }
}

/// Chains missing from the reply are priced at zero
fn prices_from_reply(reply: &PriceReply, chains: &[Chain]) -> Vec<PricedChain> {
    chains
        .iter()
        .map(|chain| {
            let price = reply
                .get(chain.name())
                .and_then(|quotes| quotes.get("usd"))
                .copied()
                .unwrap_or_else(|| {
                    logging::log_warning(&format!("[{}] no USD price in reply, using 0", chain));
                    0.0
                });
            PricedChain::new(*chain, price)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prices_follow_requested_order() {
        let reply: PriceReply = serde_json::from_str(
            r#"{"ethereum": {"usd": 3120.5}, "bitcoin": {"usd": 43210.0}}"#,
        )
        .unwrap();

        let prices = prices_from_reply(&reply, &Chain::ALL);
        assert_eq!(prices[0], PricedChain::new(Chain::Bitcoin, 43210.0));
        assert_eq!(prices[1], PricedChain::new(Chain::Ethereum, 3120.5));
    }

    #[test]
    fn test_missing_chain_priced_zero() {
        let reply: PriceReply = serde_json::from_str(r#"{"bitcoin": {"eur": 40000.0}}"#).unwrap();

        let prices = prices_from_reply(&reply, &Chain::ALL);
        assert_eq!(prices[0].price, 0.0);
        assert_eq!(prices[1].price, 0.0);
    }
}
