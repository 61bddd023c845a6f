//! SQLite storage backend implementation
//!
//! This module provides a SQLite-based implementation of the `AlertStore` trait.
//!
//! ## Features
//!
//! - **Embedded**: No separate database server required
//! - **WAL mode**: Readers are not blocked by the single writer
//! - **Connection pooling**: One pool shared by all request handlers
//! - **Migrations**: All alert collections are created on startup
//!
//! ## Writes
//!
//! Each alert is written in its own transaction. A failed statement rolls the
//! transaction back before the error is returned, so a failed insert never
//! leaves a row behind in any collection.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument, warn};

use super::backend::{AlertFilter, AlertStore, CollectionStats, HealthStatus, InsertedAlert};
use super::error::{StorageError, StorageResult};
use super::schema::{
    insert_statement, millis_to_timestamp, select_columns, timestamp_to_millis,
};
use crate::alert::{
    AlertCommon, HostFields, ModuleFields, ModuleKind, MySqlFields, NewAlert, RedisFields,
    StoredAlert, SystemFields,
};

/// Pool size used by [`SqliteBackend::new`]
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// SQLite storage backend
pub struct SqliteBackend {
    pool: Pool<Sqlite>,
    db_path: String,
}

impl SqliteBackend {
    /// Open (or create) the database at `db_path` and run migrations
    ///
    /// ## Example
    ///
    /// ```no_run
    /// # use monitor_web::storage::sqlite::SqliteBackend;
    /// # async fn example() -> anyhow::Result<()> {
    /// let backend = SqliteBackend::new("./alerts.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::connect(db_path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Same as [`SqliteBackend::new`] with an explicit pool size
    #[instrument(skip(db_path))]
    pub async fn connect(db_path: impl AsRef<Path>, max_connections: u32) -> StorageResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        if max_connections == 0 {
            return Err(StorageError::InvalidConfig(
                "max_connections must be at least 1".to_string(),
            ));
        }

        info!("initializing SQLite backend at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        info!("SQLite connection pool created");

        debug!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        info!("database migrations complete");

        Ok(Self {
            pool,
            db_path: db_path_str,
        })
    }

    fn row_to_alert(kind: ModuleKind, row: &SqliteRow) -> StorageResult<StoredAlert> {
        let common = AlertCommon {
            timestamp: millis_to_timestamp(row.try_get("timestamp")?),
            module: row.try_get("module")?,
            service_name: row.try_get("service_name")?,
            event_name: row.try_get("event_name")?,
            details: row.try_get("details")?,
            host_ip: row.try_get("host_ip")?,
            alert_type: row.try_get("alert_type")?,
            cluster_name: row.try_get("cluster_name")?,
            hostname: row.try_get("hostname")?,
        };

        let fields = match kind {
            ModuleKind::Redis => ModuleFields::Redis(RedisFields {
                big_keys_count: row.try_get("big_keys_count")?,
                failed_nodes: row.try_get("failed_nodes")?,
            }),
            ModuleKind::MySql => ModuleFields::MySql(MySqlFields {
                deadlocks_increment: row.try_get("deadlocks_increment")?,
                slow_queries_increment: row.try_get("slow_queries_increment")?,
                connections: row.try_get("connections")?,
            }),
            ModuleKind::Host => ModuleFields::Host(HostFields {
                cpu_usage: row.try_get("cpu_usage")?,
                mem_remaining: row.try_get("mem_remaining")?,
                disk_usage: row.try_get("disk_usage")?,
            }),
            ModuleKind::System => ModuleFields::System(SystemFields {
                added_users: row.try_get("added_users")?,
                removed_users: row.try_get("removed_users")?,
                added_processes: row.try_get("added_processes")?,
                removed_processes: row.try_get("removed_processes")?,
            }),
            ModuleKind::General => ModuleFields::General,
        };

        Ok(StoredAlert {
            id: row.try_get("id")?,
            common,
            created_at: millis_to_timestamp(row.try_get("created_at")?),
            fields,
        })
    }
}

#[async_trait]
impl AlertStore for SqliteBackend {
    #[instrument(skip(self, alert), fields(collection = alert.kind().collection()))]
    async fn insert_alert(&self, alert: NewAlert) -> StorageResult<InsertedAlert> {
        let kind = alert.kind();
        let sql = insert_statement(kind);
        let created_at = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;

        let common = &alert.common;
        let query = sqlx::query(&sql)
            .bind(timestamp_to_millis(&common.timestamp))
            .bind(&common.module)
            .bind(&common.service_name)
            .bind(&common.event_name)
            .bind(&common.details)
            .bind(&common.host_ip)
            .bind(&common.alert_type)
            .bind(&common.cluster_name)
            .bind(&common.hostname)
            .bind(timestamp_to_millis(&created_at));

        let query = match &alert.fields {
            ModuleFields::Redis(f) => query.bind(f.big_keys_count).bind(&f.failed_nodes),
            ModuleFields::MySql(f) => query
                .bind(f.deadlocks_increment)
                .bind(f.slow_queries_increment)
                .bind(f.connections),
            ModuleFields::Host(f) => query
                .bind(f.cpu_usage)
                .bind(f.mem_remaining)
                .bind(f.disk_usage),
            ModuleFields::System(f) => query
                .bind(&f.added_users)
                .bind(&f.removed_users)
                .bind(&f.added_processes)
                .bind(&f.removed_processes),
            ModuleFields::General => query,
        };

        let id = match query.execute(&mut *tx).await {
            Ok(result) => result.last_insert_rowid(),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("rollback after failed insert failed: {}", rollback_err);
                }
                return Err(StorageError::QueryFailed(e.to_string()));
            }
        };

        tx.commit()
            .await
            .map_err(|e| StorageError::TransactionFailed(e.to_string()))?;

        debug!("inserted alert {} into {}", id, kind.collection());
        Ok(InsertedAlert { kind, id })
    }

    #[instrument(skip(self, filter), fields(collection = kind.collection()))]
    async fn query_alerts(
        &self,
        kind: ModuleKind,
        filter: AlertFilter,
    ) -> StorageResult<Vec<StoredAlert>> {
        let mut conditions = Vec::new();
        if filter.module.is_some() {
            conditions.push("module = ?");
        }
        if filter.from.is_some() {
            conditions.push("timestamp >= ?");
        }
        if filter.to.is_some() {
            conditions.push("timestamp <= ?");
        }
        if filter.alert_type.is_some() {
            conditions.push("alert_type = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM {}
            {}
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
            select_columns(kind),
            kind.collection(),
            where_clause
        );

        let mut query = sqlx::query(&sql);
        if let Some(module) = &filter.module {
            query = query.bind(module);
        }
        if let Some(from) = &filter.from {
            query = query.bind(timestamp_to_millis(from));
        }
        if let Some(to) = &filter.to {
            query = query.bind(timestamp_to_millis(to));
        }
        if let Some(alert_type) = &filter.alert_type {
            query = query.bind(alert_type);
        }
        query = query.bind(filter.limit as i64);

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let alerts = rows
            .iter()
            .map(|row| Self::row_to_alert(kind, row))
            .collect::<StorageResult<Vec<_>>>()?;

        debug!("query returned {} alerts", alerts.len());
        Ok(alerts)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<HealthStatus> {
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(HealthStatus {
                healthy: true,
                message: "SQLite backend operational".to_string(),
                metadata: HashMap::from([
                    ("backend".to_string(), "sqlite".to_string()),
                    ("db_path".to_string(), self.db_path.clone()),
                ]),
            }),
            Err(e) => {
                warn!("health check failed: {}", e);
                Ok(HealthStatus {
                    healthy: false,
                    message: format!("health check failed: {}", e),
                    metadata: HashMap::new(),
                })
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_stats(&self) -> StorageResult<CollectionStats> {
        let mut counts = BTreeMap::new();

        for kind in ModuleKind::ALL {
            let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", kind.collection()))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
            counts.insert(kind, row.0 as u64);
        }

        Ok(CollectionStats {
            backend: "sqlite".to_string(),
            counts,
        })
    }

    async fn close(&self) -> StorageResult<()> {
        info!("closing SQLite backend");
        self.pool.close().await;
        Ok(())
    }
}
