use std::sync::Arc;

use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::PgSnapshotStore;

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Snapshot store sharing the pool; safe to hand to several chain tasks
    pub fn create_snapshot_store(db_pool: &DbPool) -> Arc<PgSnapshotStore> {
        Arc::new(PgSnapshotStore::new(db_pool.get_connection().clone()))
    }
}
