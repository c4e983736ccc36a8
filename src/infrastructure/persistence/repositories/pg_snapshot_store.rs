use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    DatabaseConnection, DatabaseTransaction, DbBackend, EntityTrait, FromQueryResult, Statement,
    TransactionTrait, Value,
};

use super::{AssetFilter, RunReceipt, SnapshotQuery, SnapshotStore};
use crate::domain::models::{OwnerType, SnapshotRecord, WalletObservation};
use crate::infrastructure::persistence::entities::{balance, whale};
use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

/// Identity upsert; on conflict only the label moves, `owner_type` stays as first stored
const UPSERT_WHALE_SQL: &str = r#"
    INSERT INTO whale (blockchain, address, owner, owner_type, is_contract)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (blockchain, address) DO UPDATE
    SET owner = EXCLUDED.owner
    RETURNING *
"#;

/// Bind parameters per balance row: whale_id, value, symbol, created_at
const BALANCE_BIND_PARAMS: usize = 4;
/// Balance rows per INSERT; Postgres caps one statement at 65,535 bind parameters
const BALANCE_INSERT_CHUNK: usize = 5_000;

#[derive(Debug, FromQueryResult)]
struct SnapshotRow {
    whale_id: i32,
    symbol: String,
    owner_type: String,
    is_contract: bool,
    value: f64,
    captured_at: DateTime<Utc>,
}

impl From<SnapshotRow> for SnapshotRecord {
    fn from(row: SnapshotRow) -> Self {
        SnapshotRecord {
            whale_id: row.whale_id,
            symbol: row.symbol,
            owner_type: OwnerType::from_db(&row.owner_type),
            is_contract: row.is_contract,
            value: row.value,
            captured_at: row.captured_at,
        }
    }
}

/// Snapshot store backed by the `whale` and `balance` tables
#[derive(Clone, Debug)]
pub struct PgSnapshotStore {
    conn: DatabaseConnection,
}

impl PgSnapshotStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn upsert_identity(
        &self,
        txn: &DatabaseTransaction,
        observation: &WalletObservation,
    ) -> Result<whale::Model, DbError> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPSERT_WHALE_SQL,
            [
                observation.chain.name().into(),
                observation.address.clone().into(),
                Value::from(observation.label.clone()),
                observation.owner_type.as_str().into(),
                observation.is_contract.into(),
            ],
        );

        whale::Entity::find()
            .from_raw_sql(stmt)
            .one(txn)
            .await?
            .ok_or_else(|| {
                DbError::QueryError(format!(
                    "upsert of {} {} returned no row",
                    observation.chain, observation.address
                ))
            })
    }

    fn snapshot_statement(query: &SnapshotQuery) -> Statement {
        let mut sql = String::from(
            r#"
            SELECT w.whale_id, b.symbol, w.owner_type, w.is_contract, b.value, b.created_at AS captured_at
            FROM balance b
            JOIN whale w ON w.whale_id = b.whale_id
            WHERE b.created_at > $1
            "#,
        );
        let mut values: Vec<Value> = vec![query.since.into()];

        match &query.asset {
            AssetFilter::Exact(symbol) => {
                values.push(symbol.clone().into());
                sql.push_str(&format!(" AND b.symbol = ${}", values.len()));
            }
            AssetFilter::Contains(fragment) => {
                values.push(format!("%{}%", fragment.replace('%', "\\%").replace('_', "\\_")).into());
                sql.push_str(&format!(" AND b.symbol LIKE ${}", values.len()));
            }
        }

        if let Some(chain) = query.chain {
            values.push(chain.name().into());
            sql.push_str(&format!(" AND w.blockchain = ${}", values.len()));
        }

        sql.push_str(" ORDER BY b.created_at, b.balance_id");
        Statement::from_sql_and_values(DbBackend::Postgres, sql, values)
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn commit_run(
        &self,
        observations: &[WalletObservation],
        captured_at: DateTime<Utc>,
    ) -> Result<RunReceipt, DbError> {
        // Dropping the transaction without commit rolls it back
        let txn = self.conn.begin().await?;

        let mut snapshots = Vec::with_capacity(observations.len());
        for observation in observations {
            let identity = self.upsert_identity(&txn, observation).await?;
            if observation.has_positive_balance() {
                snapshots.push(balance::ActiveModel {
                    balance_id: NotSet,
                    whale_id: Set(identity.whale_id),
                    value: Set(observation.balance),
                    symbol: Set(observation.symbol.clone()),
                    created_at: Set(captured_at),
                });
            }
        }

        let snapshot_count = snapshots.len();
        for chunk in snapshots.chunks(BALANCE_INSERT_CHUNK) {
            balance::Entity::insert_many(chunk.iter().cloned())
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;

        logging::log_debug(&format!(
            "Committed {} identities and {} snapshots at {}",
            observations.len(),
            snapshot_count,
            captured_at
        ));

        Ok(RunReceipt {
            identities: observations.len(),
            snapshots: snapshot_count,
            captured_at,
        })
    }

    async fn load_snapshots(&self, query: &SnapshotQuery) -> Result<Vec<SnapshotRecord>, DbError> {
        let rows = SnapshotRow::find_by_statement(Self::snapshot_statement(query))
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(SnapshotRecord::from).collect())
    }
}
