//! In-memory storage backend (no persistence)
//!
//! This backend keeps every collection in a `Vec` behind a lock.
//! It's useful for:
//! - Testing without database dependencies
//! - Running the service with `"backend": "none"`
//!
//! ## Limitations
//!
//! - **No persistence**: All data lost on restart
//! - **Unbounded**: Nothing is ever evicted

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::backend::{AlertFilter, AlertStore, CollectionStats, HealthStatus, InsertedAlert};
use super::error::{StorageError, StorageResult};
use crate::alert::{ModuleKind, NewAlert, StoredAlert};

#[derive(Default)]
struct Collection {
    next_id: i64,
    rows: Vec<StoredAlert>,
}

/// In-memory storage backend
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<ModuleKind, Collection>>,

    /// When set, every write fails with [`StorageError::BackendError`]
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AlertStore for MemoryBackend {
    async fn insert_alert(&self, alert: NewAlert) -> StorageResult<InsertedAlert> {
        let kind = alert.kind();
        let mut collections = self.collections.write().await;

        // Checked under the write lock so a failing write never touches a collection
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(format!(
                "write to {} rejected",
                kind.collection()
            )));
        }

        let collection = collections.entry(kind).or_default();
        collection.next_id += 1;
        let id = collection.next_id;

        collection.rows.push(StoredAlert {
            id,
            common: alert.common,
            created_at: Utc::now(),
            fields: alert.fields,
        });

        debug!("in-memory backend: stored alert {} in {}", id, kind.collection());
        Ok(InsertedAlert { kind, id })
    }

    async fn query_alerts(
        &self,
        kind: ModuleKind,
        filter: AlertFilter,
    ) -> StorageResult<Vec<StoredAlert>> {
        let collections = self.collections.read().await;

        let mut alerts: Vec<StoredAlert> = collections
            .get(&kind)
            .map(|c| c.rows.iter().filter(|a| filter.matches(a)).cloned().collect())
            .unwrap_or_default();

        alerts.sort_by(|a, b| {
            b.common
                .timestamp
                .cmp(&a.common.timestamp)
                .then(b.id.cmp(&a.id))
        });
        alerts.truncate(filter.limit);

        Ok(alerts)
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        let stats = self.get_stats().await?;
        Ok(HealthStatus {
            healthy: true,
            message: "In-memory storage operational".to_string(),
            metadata: HashMap::from([
                ("backend".to_string(), "memory".to_string()),
                ("total_alerts".to_string(), stats.total().to_string()),
            ]),
        })
    }

    async fn get_stats(&self) -> StorageResult<CollectionStats> {
        let collections = self.collections.read().await;
        let counts: BTreeMap<ModuleKind, u64> = ModuleKind::ALL
            .into_iter()
            .map(|kind| {
                let count = collections.get(&kind).map_or(0, |c| c.rows.len() as u64);
                (kind, count)
            })
            .collect();

        Ok(CollectionStats {
            backend: "memory".to_string(),
            counts,
        })
    }

    async fn close(&self) -> StorageResult<()> {
        debug!("closing in-memory backend (no-op)");
        Ok(())
    }
}
