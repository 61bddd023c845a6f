//! Table layout of the alert collections
//!
//! Every collection starts with the same common columns (see
//! `migrations/`), followed by the columns of its module. Timestamps are
//! stored as Unix milliseconds so range filters compare integers. Sub-millisecond
//! precision is truncated on write and compared in its truncated form.

use chrono::{DateTime, Utc};

use crate::alert::ModuleKind;

/// Columns present in every collection, in insert order (without `id`)
pub const COMMON_COLUMNS: [&str; 10] = [
    "timestamp",
    "module",
    "service_name",
    "event_name",
    "details",
    "host_ip",
    "alert_type",
    "cluster_name",
    "hostname",
    "created_at",
];

/// Module-specific columns of a collection
pub fn module_columns(kind: ModuleKind) -> &'static [&'static str] {
    match kind {
        ModuleKind::Redis => &["big_keys_count", "failed_nodes"],
        ModuleKind::MySql => &[
            "deadlocks_increment",
            "slow_queries_increment",
            "connections",
        ],
        ModuleKind::Host => &["cpu_usage", "mem_remaining", "disk_usage"],
        ModuleKind::System => &[
            "added_users",
            "removed_users",
            "added_processes",
            "removed_processes",
        ],
        ModuleKind::General => &[],
    }
}

/// All columns written on insert for a collection
pub fn insert_columns(kind: ModuleKind) -> Vec<&'static str> {
    COMMON_COLUMNS
        .iter()
        .chain(module_columns(kind))
        .copied()
        .collect()
}

/// `INSERT` statement for a collection, with one `?` per column
pub fn insert_statement(kind: ModuleKind) -> String {
    let columns = insert_columns(kind);
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        kind.collection(),
        columns.join(", "),
        placeholders
    )
}

/// Column list for reading a collection, `id` first
pub fn select_columns(kind: ModuleKind) -> String {
    std::iter::once("id")
        .chain(insert_columns(kind))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn timestamp_to_millis(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

pub fn millis_to_timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}
