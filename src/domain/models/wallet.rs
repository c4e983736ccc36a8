use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chain::Chain;

/// Who controls a wallet, as far as cohort analytics are concerned.
///
/// Set once when the identity is first stored. Later scrapes never overwrite it;
/// corrections are made by hand in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerType {
    #[default]
    Unknown,
    Exchange,
    Contract,
    Stake,
    Wrap,
    Burn,
}

impl OwnerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerType::Unknown => "unknown",
            OwnerType::Exchange => "exchange",
            OwnerType::Contract => "contract",
            OwnerType::Stake => "stake",
            OwnerType::Wrap => "wrap",
            OwnerType::Burn => "burn",
        }
    }

    /// Provisional tag derived from what a holder page shows
    pub fn infer(is_contract: bool, label: Option<&str>) -> OwnerType {
        if is_contract {
            OwnerType::Contract
        } else if label.is_some_and(|l| !l.is_empty()) {
            OwnerType::Exchange
        } else {
            OwnerType::Unknown
        }
    }

    /// Values stored by hand may be outside the known set; those count as unknown.
    pub fn from_db(value: &str) -> OwnerType {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(OwnerType::Unknown),
            "exchange" => Ok(OwnerType::Exchange),
            "contract" => Ok(OwnerType::Contract),
            "stake" => Ok(OwnerType::Stake),
            "wrap" => Ok(OwnerType::Wrap),
            "burn" => Ok(OwnerType::Burn),
            other => Err(format!("unknown owner type: {}", other)),
        }
    }
}

/// One holder row scraped from a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct WalletObservation {
    pub chain: Chain,
    pub address: String,
    /// Display label shown by the explorer (exchange name, bridge, ...)
    pub label: Option<String>,
    pub balance: f64,
    pub is_contract: bool,
    pub owner_type: OwnerType,
    /// Asset the balance is denominated in
    pub symbol: String,
}

impl WalletObservation {
    /// Creates an observation and derives its provisional owner type
    pub fn new(
        chain: Chain,
        symbol: impl Into<String>,
        address: impl Into<String>,
        label: Option<String>,
        balance: f64,
        is_contract: bool,
    ) -> Self {
        let label = label.filter(|l| !l.is_empty());
        let owner_type = OwnerType::infer(is_contract, label.as_deref());
        Self {
            chain,
            address: address.into(),
            label,
            balance,
            is_contract,
            owner_type,
            symbol: symbol.into(),
        }
    }

    pub fn has_positive_balance(&self) -> bool {
        self.balance > 0.0
    }
}

/// A stored balance snapshot joined with its wallet identity
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub whale_id: i32,
    /// Asset the snapshot is denominated in
    pub symbol: String,
    pub owner_type: OwnerType,
    pub is_contract: bool,
    pub value: f64,
    pub captured_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_owner_type() {
        assert_eq!(OwnerType::infer(true, Some("Uniswap")), OwnerType::Contract);
        assert_eq!(OwnerType::infer(true, None), OwnerType::Contract);
        assert_eq!(OwnerType::infer(false, Some("Binance")), OwnerType::Exchange);
        assert_eq!(OwnerType::infer(false, Some("")), OwnerType::Unknown);
        assert_eq!(OwnerType::infer(false, None), OwnerType::Unknown);
    }

    #[test]
    fn test_owner_type_from_db() {
        assert_eq!(OwnerType::from_db("stake"), OwnerType::Stake);
        assert_eq!(OwnerType::from_db("burn"), OwnerType::Burn);
        assert_eq!(OwnerType::from_db("whatever"), OwnerType::Unknown);
    }

    #[test]
    fn test_observation_drops_empty_label() {
        let obs = WalletObservation::new(Chain::Bitcoin, "BTC", "bc1q", Some(String::new()), 5.0, false);
        assert_eq!(obs.label, None);
        assert_eq!(obs.owner_type, OwnerType::Unknown);
    }
}
