//! Alert event and record definitions
//!
//! ## Wire vs. storage shape
//!
//! Probes send a flat [`AlertEvent`]: a set of common fields plus optional
//! per-module fields. Only the fields belonging to the event's module carry
//! meaning, the rest are ignored even when present.
//!
//! On the storage side every alert shares the common [`AlertCommon`] columns
//! and carries exactly one [`ModuleFields`] variant. The variant decides the
//! collection the record lives in:
//!
//! | module     | variant                 | collection       |
//! |------------|-------------------------|------------------|
//! | `redis`    | [`ModuleFields::Redis`] | `redis_alerts`   |
//! | `mysql`    | [`ModuleFields::MySql`] | `mysql_alerts`   |
//! | `host`     | [`ModuleFields::Host`]  | `host_alerts`    |
//! | `system`   | [`ModuleFields::System`]| `system_alerts`  |
//! | otherwise  | [`ModuleFields::General`]| `general_alerts`|
//!
//! ## Defaults
//!
//! Optional module fields missing from the event are coerced to the values of
//! the `Default` impl of the matching `*Fields` struct (zero for numbers, empty
//! string for text). Those impls are the single default table for the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// An alert event as sent by a monitoring probe
///
/// Common text fields accept `null` or may be left out entirely; both decode
/// to an empty string. A missing `timestamp` stays `None` here and is filled
/// in by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub module: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub service_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub event_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub details: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub host_ip: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub alert_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub cluster_name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub hostname: String,

    // === Redis ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub big_keys_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_nodes: Option<String>,

    // === MySQL ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadlocks_increment: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_queries_increment: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<i64>,

    // === Host ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mem_remaining: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_usage: Option<f64>,

    // === System ===
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_users: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_users: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_processes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_processes: Option<String>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Module that owns a dedicated storage shape
///
/// Ingestion routes on this tag. Anything that is not one of the four named
/// modules maps to [`ModuleKind::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Redis,
    #[serde(rename = "mysql")]
    MySql,
    Host,
    System,
    General,
}

impl ModuleKind {
    /// Every kind, in table creation order
    pub const ALL: [ModuleKind; 5] = [
        ModuleKind::General,
        ModuleKind::Redis,
        ModuleKind::MySql,
        ModuleKind::Host,
        ModuleKind::System,
    ];

    /// Resolve the module name of an event (exact, case-sensitive match)
    ///
    /// Returns `None` for names without a dedicated shape so callers can tell
    /// a fallback apart from an explicit match.
    pub fn from_module_name(module: &str) -> Option<Self> {
        match module {
            "redis" => Some(ModuleKind::Redis),
            "mysql" => Some(ModuleKind::MySql),
            "host" => Some(ModuleKind::Host),
            "system" => Some(ModuleKind::System),
            _ => None,
        }
    }

    /// Name of the collection (table) records of this kind are stored in
    pub fn collection(&self) -> &'static str {
        match self {
            ModuleKind::Redis => "redis_alerts",
            ModuleKind::MySql => "mysql_alerts",
            ModuleKind::Host => "host_alerts",
            ModuleKind::System => "system_alerts",
            ModuleKind::General => "general_alerts",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Redis => "redis",
            ModuleKind::MySql => "mysql",
            ModuleKind::Host => "host",
            ModuleKind::System => "system",
            ModuleKind::General => "general",
        }
    }
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns shared by every alert collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCommon {
    pub timestamp: DateTime<Utc>,
    pub module: String,
    pub service_name: String,
    pub event_name: String,
    pub details: String,
    pub host_ip: String,
    pub alert_type: String,
    pub cluster_name: String,
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedisFields {
    pub big_keys_count: i64,
    pub failed_nodes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MySqlFields {
    pub deadlocks_increment: i64,
    pub slow_queries_increment: i64,
    pub connections: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostFields {
    pub cpu_usage: f64,
    pub mem_remaining: f64,
    pub disk_usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemFields {
    pub added_users: String,
    pub removed_users: String,
    pub added_processes: String,
    pub removed_processes: String,
}

impl RedisFields {
    pub fn from_event(event: &AlertEvent) -> Self {
        let defaults = Self::default();
        Self {
            big_keys_count: event.big_keys_count.unwrap_or(defaults.big_keys_count),
            failed_nodes: event.failed_nodes.clone().unwrap_or(defaults.failed_nodes),
        }
    }
}

impl MySqlFields {
    pub fn from_event(event: &AlertEvent) -> Self {
        let defaults = Self::default();
        Self {
            deadlocks_increment: event
                .deadlocks_increment
                .unwrap_or(defaults.deadlocks_increment),
            slow_queries_increment: event
                .slow_queries_increment
                .unwrap_or(defaults.slow_queries_increment),
            connections: event.connections.unwrap_or(defaults.connections),
        }
    }
}

impl HostFields {
    pub fn from_event(event: &AlertEvent) -> Self {
        let defaults = Self::default();
        Self {
            cpu_usage: event.cpu_usage.unwrap_or(defaults.cpu_usage),
            mem_remaining: event.mem_remaining.unwrap_or(defaults.mem_remaining),
            disk_usage: event.disk_usage.unwrap_or(defaults.disk_usage),
        }
    }
}

impl SystemFields {
    pub fn from_event(event: &AlertEvent) -> Self {
        let defaults = Self::default();
        Self {
            added_users: event.added_users.clone().unwrap_or(defaults.added_users),
            removed_users: event.removed_users.clone().unwrap_or(defaults.removed_users),
            added_processes: event
                .added_processes
                .clone()
                .unwrap_or(defaults.added_processes),
            removed_processes: event
                .removed_processes
                .clone()
                .unwrap_or(defaults.removed_processes),
        }
    }
}

/// Module-specific part of an alert record
///
/// Serialized with a `kind` tag next to the variant's own fields, so a
/// flattened record reads as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModuleFields {
    Redis(RedisFields),
    #[serde(rename = "mysql")]
    MySql(MySqlFields),
    Host(HostFields),
    System(SystemFields),
    General,
}

impl ModuleFields {
    /// Pick the variant for `kind`, taking its fields from the event
    pub fn from_event(kind: ModuleKind, event: &AlertEvent) -> Self {
        match kind {
            ModuleKind::Redis => ModuleFields::Redis(RedisFields::from_event(event)),
            ModuleKind::MySql => ModuleFields::MySql(MySqlFields::from_event(event)),
            ModuleKind::Host => ModuleFields::Host(HostFields::from_event(event)),
            ModuleKind::System => ModuleFields::System(SystemFields::from_event(event)),
            ModuleKind::General => ModuleFields::General,
        }
    }

    pub fn kind(&self) -> ModuleKind {
        match self {
            ModuleFields::Redis(_) => ModuleKind::Redis,
            ModuleFields::MySql(_) => ModuleKind::MySql,
            ModuleFields::Host(_) => ModuleKind::Host,
            ModuleFields::System(_) => ModuleKind::System,
            ModuleFields::General => ModuleKind::General,
        }
    }
}

/// A record ready to be written; `id` and `created_at` are assigned by storage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlert {
    #[serde(flatten)]
    pub common: AlertCommon,
    #[serde(flatten)]
    pub fields: ModuleFields,
}

impl NewAlert {
    pub fn kind(&self) -> ModuleKind {
        self.fields.kind()
    }
}

/// A persisted alert as returned by queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredAlert {
    pub id: i64,
    #[serde(flatten)]
    pub common: AlertCommon,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: ModuleFields,
}
