use std::fmt;

use serde::{Deserialize, Serialize};

/// Blockchains whose native asset holders are scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Bitcoin,
    Ethereum,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Bitcoin, Chain::Ethereum];

    /// Name used in the `whale.blockchain` column and by the price source
    pub fn name(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "bitcoin",
            Chain::Ethereum => "ethereum",
        }
    }

    /// Ticker of the native asset
    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Bitcoin => "BTC",
            Chain::Ethereum => "ETH",
        }
    }

    pub fn from_name(name: &str) -> Option<Chain> {
        Chain::ALL.into_iter().find(|chain| chain.name() == name)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token whose holder list is scraped alongside its chain's native asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenContract {
    pub symbol: String,
    pub address: String,
    #[serde(rename = "blockchain")]
    pub chain: Chain,
}

/// A chain with the USD price fetched for the current run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricedChain {
    pub chain: Chain,
    pub symbol: &'static str,
    pub price: f64,
}

impl PricedChain {
    pub fn new(chain: Chain, price: f64) -> Self {
        Self {
            chain,
            symbol: chain.symbol(),
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_contract_from_config_json() {
        let token: TokenContract = serde_json::from_str(
            r#"{"symbol":"USDT","address":"0xdac17f958d2ee523a2206206994597c13d831ec7","blockchain":"ethereum"}"#,
        )
        .unwrap();
        assert_eq!(token.chain, Chain::Ethereum);
        assert_eq!(token.symbol, "USDT");
    }

    #[test]
    fn test_chain_names_round_trip() {
        for chain in Chain::ALL {
            assert_eq!(Chain::from_name(chain.name()), Some(chain));
        }
        assert_eq!(Chain::from_name("solana"), None);
    }

    #[test]
    fn test_priced_chain_serializes_symbol() {
        let json = serde_json::to_value(PricedChain::new(Chain::Bitcoin, 43_000.0)).unwrap();
        assert_eq!(json["chain"], "bitcoin");
        assert_eq!(json["symbol"], "BTC");
        assert_eq!(json["price"], 43_000.0);
    }
}
