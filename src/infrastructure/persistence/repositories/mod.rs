pub mod memory_snapshot_store;
pub mod pg_snapshot_store;

pub use memory_snapshot_store::{MemorySnapshotStore, StoredIdentity};
pub use pg_snapshot_store::PgSnapshotStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Chain, SnapshotRecord, WalletObservation};
use crate::infrastructure::persistence::error::DbError;

/// Which asset symbols a snapshot query covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetFilter {
    /// One symbol, e.g. `ETH`
    Exact(String),
    /// Every symbol containing the fragment, e.g. `USD` for USDT and USDC
    Contains(String),
}

impl AssetFilter {
    pub fn matches(&self, symbol: &str) -> bool {
        match self {
            AssetFilter::Exact(expected) => symbol == expected,
            AssetFilter::Contains(fragment) => symbol.contains(fragment.as_str()),
        }
    }
}

/// Snapshots to load for one series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotQuery {
    /// Restrict to identities of one chain; `None` spans chains
    pub chain: Option<Chain>,
    pub asset: AssetFilter,
    /// Only snapshots captured strictly after this instant
    pub since: DateTime<Utc>,
}

/// What one committed run wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReceipt {
    pub identities: usize,
    pub snapshots: usize,
    pub captured_at: DateTime<Utc>,
}

/// Durable storage for wallet identities and their balance history.
///
/// `commit_run` is all-or-nothing: on error nothing from that run is visible.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Upsert every identity (label only on conflict) and append one snapshot
    /// per positive balance, stamped `captured_at`
    async fn commit_run(
        &self,
        observations: &[WalletObservation],
        captured_at: DateTime<Utc>,
    ) -> Result<RunReceipt, DbError>;

    /// Snapshots joined with their identity, oldest first
    async fn load_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<SnapshotRecord>, DbError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_filter() {
        let usd = AssetFilter::Contains("USD".into());
        assert!(usd.matches("USDT"));
        assert!(usd.matches("BUSD"));
        assert!(!usd.matches("DAI"));

        let eth = AssetFilter::Exact("ETH".into());
        assert!(eth.matches("ETH"));
        assert!(!eth.matches("WETH"));
    }
}
