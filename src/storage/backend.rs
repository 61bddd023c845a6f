//! Storage backend trait definition
//!
//! This module defines the core `AlertStore` trait that all
//! storage implementations must implement.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StorageResult;
use crate::alert::{ModuleKind, NewAlert, StoredAlert};

/// Filter for reading one alert collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    /// Restrict to records whose `module` column equals this value
    pub module: Option<String>,

    /// Lower timestamp bound (inclusive)
    pub from: Option<DateTime<Utc>>,

    /// Upper timestamp bound (inclusive)
    pub to: Option<DateTime<Utc>>,

    /// Exact `alert_type` match
    pub alert_type: Option<String>,

    /// Maximum number of records to return
    pub limit: usize,
}

impl AlertFilter {
    /// Check a record against every condition except `limit`
    pub fn matches(&self, alert: &StoredAlert) -> bool {
        let common = &alert.common;
        self.module.as_ref().is_none_or(|m| &common.module == m)
            && self.from.is_none_or(|from| common.timestamp >= from)
            && self.to.is_none_or(|to| common.timestamp <= to)
            && self
                .alert_type
                .as_ref()
                .is_none_or(|t| &common.alert_type == t)
    }
}

/// Identity of a freshly written record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedAlert {
    /// Collection the record was written to
    pub kind: ModuleKind,

    /// Generated id, unique and increasing within the collection
    pub id: i64,
}

/// Health status of the storage backend
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Is the backend operational?
    pub healthy: bool,

    /// Human-readable status message
    pub message: String,

    /// Additional backend-specific metadata
    pub metadata: HashMap<String, String>,
}

/// Row counts per collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionStats {
    pub backend: String,
    pub counts: BTreeMap<ModuleKind, u64>,
}

impl CollectionStats {
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Trait for alert storage backends
///
/// ## Writes
///
/// `insert_alert` writes exactly one record into the collection chosen by the
/// record's [`ModuleKind`]. The write happens inside its own transaction:
/// either the record is committed or nothing is visible at all.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync`; one instance is shared by every
/// request handler.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Insert a single alert atomically and return its identity
    async fn insert_alert(&self, alert: NewAlert) -> StorageResult<InsertedAlert>;

    /// Read one collection, newest first, capped at `filter.limit`
    async fn query_alerts(
        &self,
        kind: ModuleKind,
        filter: AlertFilter,
    ) -> StorageResult<Vec<StoredAlert>>;

    /// Check backend health
    async fn health_check(&self) -> StorageResult<HealthStatus>;

    /// Row counts for every collection
    async fn get_stats(&self) -> StorageResult<CollectionStats>;

    /// Close the backend and release resources
    async fn close(&self) -> StorageResult<()>;
}
