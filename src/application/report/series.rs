use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::models::{Chain, HourlyCohortRow, MergedPoint};
use crate::domain::services::{build_hourly_rows, CohortParams};
use crate::infrastructure::persistence::{AssetFilter, DbError, SnapshotQuery, SnapshotStore};

/// Symbol fragment shared by the stable coins folded into the USD series
pub const STABLE_SYMBOL_FRAGMENT: &str = "USD";

/// Builds the hourly cohort series the report and the dashboard read
pub struct SeriesBuilder {
    store: Arc<dyn SnapshotStore>,
    params: CohortParams,
    /// Stable coin rows before this are ignored
    capture_start: Option<DateTime<Utc>>,
}

impl SeriesBuilder {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            store,
            params: CohortParams::default(),
            capture_start: None,
        }
    }

    pub fn with_params(mut self, params: CohortParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_capture_start(mut self, capture_start: Option<DateTime<Utc>>) -> Self {
        self.capture_start = capture_start;
        self
    }

    async fn series(&self, query: SnapshotQuery, now: DateTime<Utc>) -> Result<Vec<HourlyCohortRow>, DbError> {
        let records = self.store.load_snapshots(&query).await?;
        Ok(build_hourly_rows(&records, now, &self.params))
    }

    /// Native asset series of one chain
    pub async fn chain_series(
        &self,
        chain: Chain,
        now: DateTime<Utc>,
    ) -> Result<Vec<HourlyCohortRow>, DbError> {
        let query = SnapshotQuery {
            chain: Some(chain),
            asset: AssetFilter::Exact(chain.symbol().to_string()),
            since: self.params.history_start(now),
        };
        self.series(query, now).await
    }

    /// Stable coin series across every chain
    pub async fn usd_series(&self, now: DateTime<Utc>) -> Result<Vec<HourlyCohortRow>, DbError> {
        let history_start = self.params.history_start(now);
        let since = match self.capture_start {
            Some(start) if start > history_start => start,
            _ => history_start,
        };
        let query = SnapshotQuery {
            chain: None,
            asset: AssetFilter::Contains(STABLE_SYMBOL_FRAGMENT.to_string()),
            since,
        };
        self.series(query, now).await
    }

    /// The three series aligned on the ethereum hours
    pub async fn merged_points(&self, now: DateTime<Utc>) -> Result<Vec<MergedPoint>, DbError> {
        let eth = self.chain_series(Chain::Ethereum, now).await?;
        let btc = self.chain_series(Chain::Bitcoin, now).await?;
        let usd = self.usd_series(now).await?;
        Ok(merge_series(eth, btc, usd))
    }
}

/// Align three series on the hours of `eth`; an hour missing from another series
/// gets an empty row
pub fn merge_series(
    eth: Vec<HourlyCohortRow>,
    btc: Vec<HourlyCohortRow>,
    usd: Vec<HourlyCohortRow>,
) -> Vec<MergedPoint> {
    let btc: HashMap<_, _> = btc.into_iter().map(|row| (row.hour, row)).collect();
    let usd: HashMap<_, _> = usd.into_iter().map(|row| (row.hour, row)).collect();

    eth.into_iter()
        .map(|row| MergedPoint {
            hour: row.hour,
            btc: btc.get(&row.hour).copied().unwrap_or_else(|| HourlyCohortRow::empty(row.hour)),
            usd: usd.get(&row.hour).copied().unwrap_or_else(|| HourlyCohortRow::empty(row.hour)),
            eth: row,
        })
        .collect()
}
