//! Integration tests for SQLite persistence
//!
//! These tests verify that:
//! - Alerts survive closing and reopening the database
//! - Module defaults are what ends up in the columns
//! - Ids keep increasing across restarts
//! - Dashboard queries behave the same as against the memory backend

use std::sync::Arc;

use assert_matches::assert_matches;
use monitor_web::{
    Dispatcher, ModuleKind,
    alert::ModuleFields,
    query::{DashboardParams, load_module_view},
    storage::{AlertFilter, AlertStore, sqlite::SqliteBackend},
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

use crate::helpers::*;

async fn open(path: &std::path::Path) -> Arc<dyn AlertStore> {
    Arc::new(SqliteBackend::new(path).await.unwrap())
}

#[tokio::test]
async fn test_alerts_survive_restart() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("alerts.db");

    let first_id = {
        let store = open(&db_path).await;
        let dispatcher = Dispatcher::new(store.clone());
        let inserted = dispatcher
            .dispatch_json(
                br#"{"module":"mysql","service_name":"orders-db","event_name":"deadlock","deadlocks_increment":3}"#,
            )
            .await
            .unwrap();
        store.close().await.unwrap();
        inserted.id
    };

    let store = open(&db_path).await;
    let view = load_module_view(store.as_ref(), "mysql", &DashboardParams::default())
        .await
        .unwrap();

    assert_eq!(view.alerts.len(), 1);
    assert_eq!(view.alerts[0].id, first_id);
    assert_eq!(view.alerts[0].common.service_name, "orders-db");
    assert_matches!(&view.alerts[0].fields, ModuleFields::MySql(fields) => {
        assert_eq!(fields.deadlocks_increment, 3);
        assert_eq!(fields.slow_queries_increment, 0);
        assert_eq!(fields.connections, 0);
    });

    // Ids continue after the restart
    let next = Dispatcher::new(store.clone())
        .dispatch(create_test_event("mysql", "slow_queries"))
        .await
        .unwrap();
    assert!(next.id > first_id);

    store.close().await.unwrap();
}

#[tokio::test]
async fn test_host_metrics_persisted() {
    let dir = tempdir().unwrap();
    let store = open(&dir.path().join("alerts.db")).await;
    let dispatcher = Dispatcher::new(store.clone());

    dispatcher
        .dispatch_json(
            br#"{"module":"host","service_name":"node","event_name":"disk_full","cpu_usage":91.5,"disk_usage":97.25}"#,
        )
        .await
        .unwrap();

    let alerts = store
        .query_alerts(
            ModuleKind::Host,
            AlertFilter {
                limit: 10,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(alerts.len(), 1);
    assert_matches!(&alerts[0].fields, ModuleFields::Host(fields) => {
        assert_eq!(fields.cpu_usage, 91.5);
        assert_eq!(fields.mem_remaining, 0.0);
        assert_eq!(fields.disk_usage, 97.25);
    });
}

#[tokio::test]
async fn test_general_collection_filters_by_module() {
    let dir = tempdir().unwrap();
    let store = open(&dir.path().join("alerts.db")).await;
    let dispatcher = Dispatcher::new(store.clone());

    for module in ["rabbitmq", "rabbitmq", "nacos", "unknown_module_x"] {
        let body = create_alert_json(module, "2025-09-02T10:00:00Z", "critical").to_string();
        dispatcher.dispatch_json(body.as_bytes()).await.unwrap();
    }

    let stats = store.get_stats().await.unwrap();
    assert_eq!(stats.counts[&ModuleKind::General], 4);
    assert_eq!(stats.total(), 4);

    let nacos = load_module_view(store.as_ref(), "nacos", &DashboardParams::default())
        .await
        .unwrap();
    assert_eq!(nacos.alerts.len(), 1);

    let rabbitmq = load_module_view(store.as_ref(), "rabbitmq", &DashboardParams::default())
        .await
        .unwrap();
    assert_eq!(rabbitmq.alerts.len(), 2);
    assert_eq!(rabbitmq.series.labels, vec!["2025-09-02"]);
    assert_eq!(rabbitmq.series.counts, vec![2]);

    let general = load_module_view(store.as_ref(), "general", &DashboardParams::default())
        .await
        .unwrap();
    assert_eq!(general.alerts.len(), 4);
}

#[tokio::test]
async fn test_timestamps_round_trip_at_millisecond_precision() {
    let dir = tempdir().unwrap();
    let store = open(&dir.path().join("alerts.db")).await;
    let dispatcher = Dispatcher::new(store.clone());

    let body = create_alert_json("redis", "2025-09-05T14:03:27.123Z", "warning").to_string();
    dispatcher.dispatch_json(body.as_bytes()).await.unwrap();

    let view = load_module_view(store.as_ref(), "redis", &DashboardParams::default())
        .await
        .unwrap();
    assert_eq!(
        view.alerts[0].common.timestamp.to_rfc3339(),
        "2025-09-05T14:03:27.123+00:00"
    );
    assert_eq!(view.alerts[0].common.cluster_name, "prod");
}
