use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{RunReceipt, SnapshotQuery, SnapshotStore};
use crate::domain::models::{Chain, OwnerType, SnapshotRecord, WalletObservation};
use crate::infrastructure::persistence::error::DbError;

/// A wallet identity as held by the in-memory store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredIdentity {
    pub whale_id: i32,
    pub chain: Chain,
    pub address: String,
    pub label: Option<String>,
    pub owner_type: OwnerType,
    pub is_contract: bool,
}

#[derive(Debug, Clone)]
struct StoredSnapshot {
    whale_id: i32,
    value: f64,
    symbol: String,
    captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct State {
    identities: Vec<StoredIdentity>,
    by_key: HashMap<(Chain, String), usize>,
    snapshots: Vec<StoredSnapshot>,
}

impl State {
    fn upsert(&mut self, observation: &WalletObservation) -> i32 {
        let key = (observation.chain, observation.address.clone());
        if let Some(&index) = self.by_key.get(&key) {
            let identity = &mut self.identities[index];
            identity.label = observation.label.clone();
            return identity.whale_id;
        }

        let whale_id = self.identities.len() as i32 + 1;
        self.identities.push(StoredIdentity {
            whale_id,
            chain: observation.chain,
            address: observation.address.clone(),
            label: observation.label.clone(),
            owner_type: observation.owner_type,
            is_contract: observation.is_contract,
        });
        self.by_key.insert(key, self.identities.len() - 1);
        whale_id
    }
}

/// Snapshot store kept in process memory.
///
/// Same contract as the Postgres store: a run is staged on a copy and only
/// swapped in once every write succeeded.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    state: Mutex<State>,
    fail_at: Mutex<Option<usize>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an identity as if its tag had been set by hand
    pub fn seed_identity(
        &self,
        chain: Chain,
        address: &str,
        owner_type: OwnerType,
        label: Option<&str>,
    ) -> Result<i32, DbError> {
        let mut observation = WalletObservation::new(
            chain,
            chain.symbol(),
            address,
            label.map(str::to_string),
            0.0,
            owner_type == OwnerType::Contract,
        );
        observation.owner_type = owner_type;
        Ok(self.lock_state()?.upsert(&observation))
    }

    /// Make the next commit fail while writing the observation at `index`
    pub fn fail_next_commit_at(&self, index: usize) {
        if let Ok(mut fail_at) = self.fail_at.lock() {
            *fail_at = Some(index);
        }
    }

    pub fn identity(&self, chain: Chain, address: &str) -> Option<StoredIdentity> {
        let state = self.state.lock().ok()?;
        let index = *state.by_key.get(&(chain, address.to_string()))?;
        state.identities.get(index).cloned()
    }

    pub fn identity_count(&self) -> usize {
        self.state.lock().map(|s| s.identities.len()).unwrap_or(0)
    }

    pub fn snapshot_count(&self) -> usize {
        self.state.lock().map(|s| s.snapshots.len()).unwrap_or(0)
    }

    /// `(value, captured_at)` history of one wallet in insertion order
    pub fn history(&self, chain: Chain, address: &str) -> Vec<(f64, DateTime<Utc>)> {
        let Some(identity) = self.identity(chain, address) else {
            return Vec::new();
        };
        let Ok(state) = self.state.lock() else {
            return Vec::new();
        };
        state
            .snapshots
            .iter()
            .filter(|s| s.whale_id == identity.whale_id)
            .map(|s| (s.value, s.captured_at))
            .collect()
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, State>, DbError> {
        self.state
            .lock()
            .map_err(|_| DbError::ConnectionError("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn commit_run(
        &self,
        observations: &[WalletObservation],
        captured_at: DateTime<Utc>,
    ) -> Result<RunReceipt, DbError> {
        let fail_at = self.fail_at.lock().ok().and_then(|mut f| f.take());
        let mut state = self.lock_state()?;
        let mut staged = state.clone();

        let mut snapshot_count = 0;
        for (index, observation) in observations.iter().enumerate() {
            if fail_at == Some(index) {
                return Err(DbError::QueryError(format!(
                    "injected failure writing {}",
                    observation.address
                )));
            }
            let whale_id = staged.upsert(observation);
            if observation.has_positive_balance() {
                staged.snapshots.push(StoredSnapshot {
                    whale_id,
                    value: observation.balance,
                    symbol: observation.symbol.clone(),
                    captured_at,
                });
                snapshot_count += 1;
            }
        }

        *state = staged;
        Ok(RunReceipt {
            identities: observations.len(),
            snapshots: snapshot_count,
            captured_at,
        })
    }

    async fn load_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<SnapshotRecord>, DbError> {
        let state = self.lock_state()?;
        let by_id: HashMap<i32, &StoredIdentity> =
            state.identities.iter().map(|i| (i.whale_id, i)).collect();

        let mut records: Vec<SnapshotRecord> = state
            .snapshots
            .iter()
            .filter(|s| s.captured_at > query.since && query.asset.matches(&s.symbol))
            .filter_map(|s| {
                let identity = by_id.get(&s.whale_id)?;
                if query.chain.is_some_and(|chain| chain != identity.chain) {
                    return None;
                }
                Some(SnapshotRecord {
                    whale_id: s.whale_id,
                    symbol: s.symbol.clone(),
                    owner_type: identity.owner_type,
                    is_contract: identity.is_contract,
                    value: s.value,
                    captured_at: s.captured_at,
                })
            })
            .collect();
        records.sort_by_key(|r| r.captured_at);
        Ok(records)
    }
}
