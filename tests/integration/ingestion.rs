//! End-to-end tests of the ingest and dashboard pipeline
//!
//! These tests verify that:
//! - Every alert lands in exactly one collection
//! - Module-specific defaults are applied on ingest
//! - Dashboard filters, ordering and the result cap hold
//! - Rejected alerts leave storage untouched

use assert_matches::assert_matches;
use monitor_web::{
    Dispatcher, Error, ModuleKind,
    alert::ModuleFields,
    query::{DashboardParams, MAX_RESULTS, load_module_view},
    storage::AlertStore,
    validate::ValidationError,
};
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test]
async fn test_alerts_route_to_their_collections() {
    let (backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store);

    for module in ["redis", "mysql", "host", "system", "rabbitmq", "Redis"] {
        dispatcher
            .dispatch(create_test_event(module, "check_failed"))
            .await
            .unwrap();
    }

    let stats = backend.get_stats().await.unwrap();
    assert_eq!(stats.total(), 6);
    assert_eq!(stats.counts[&ModuleKind::Redis], 1);
    assert_eq!(stats.counts[&ModuleKind::MySql], 1);
    assert_eq!(stats.counts[&ModuleKind::Host], 1);
    assert_eq!(stats.counts[&ModuleKind::System], 1);
    // "rabbitmq" and the miscased "Redis" both fall back to general
    assert_eq!(stats.counts[&ModuleKind::General], 2);
}

#[tokio::test]
async fn test_redis_big_keys_default_and_explicit() {
    let (_backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    dispatcher
        .dispatch_json(br#"{"module":"redis","service_name":"cache","event_name":"big_keys"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch_json(
            br#"{"module":"redis","service_name":"cache","event_name":"big_keys","big_keys_count":5}"#,
        )
        .await
        .unwrap();

    let view = load_module_view(store.as_ref(), "redis", &DashboardParams::default())
        .await
        .unwrap();

    let mut counts: Vec<i64> = view
        .alerts
        .iter()
        .map(|alert| match &alert.fields {
            ModuleFields::Redis(fields) => fields.big_keys_count,
            other => panic!("unexpected fields {other:?}"),
        })
        .collect();
    counts.sort();
    assert_eq!(counts, vec![0, 5]);
}

#[tokio::test]
async fn test_system_alert_defaults_to_empty_strings() {
    let (_backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    dispatcher
        .dispatch(create_test_event("system", "user_added"))
        .await
        .unwrap();

    let view = load_module_view(store.as_ref(), "system", &DashboardParams::default())
        .await
        .unwrap();

    assert_eq!(view.alerts.len(), 1);
    assert_matches!(&view.alerts[0].fields, ModuleFields::System(fields) => {
        assert_eq!(fields.added_users, "");
        assert_eq!(fields.removed_users, "");
        assert_eq!(fields.added_processes, "");
        assert_eq!(fields.removed_processes, "");
    });
}

#[tokio::test]
async fn test_unknown_module_only_in_general() {
    let (backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    let inserted = dispatcher
        .dispatch(create_test_event("unknown_module_x", "ping"))
        .await
        .unwrap();
    assert_eq!(inserted.kind, ModuleKind::General);

    let stats = backend.get_stats().await.unwrap();
    assert_eq!(stats.total(), 1);

    let view = load_module_view(store.as_ref(), "general", &DashboardParams::default())
        .await
        .unwrap();
    assert_eq!(view.alerts.len(), 1);
    assert_eq!(view.alerts[0].common.module, "unknown_module_x");
}

#[tokio::test]
async fn test_rejected_alerts_store_nothing() {
    let (backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store);

    let missing = dispatcher.dispatch_json(br#"{"module":"redis"}"#).await;
    assert_matches!(
        missing,
        Err(Error::Validation(ValidationError::MissingFields(fields)))
            if fields == vec!["service_name", "event_name"]
    );

    let malformed = dispatcher.dispatch_json(b"{not json").await;
    assert_matches!(malformed, Err(Error::Validation(ValidationError::InvalidJson(_))));

    assert_eq!(backend.get_stats().await.unwrap().total(), 0);
}

#[tokio::test]
async fn test_storage_failure_is_persistence_error() {
    let (backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store);
    backend.set_fail_writes(true);

    let result = dispatcher
        .dispatch(create_test_event("host", "disk_full"))
        .await;
    assert_matches!(result, Err(Error::Persistence(_)));

    backend.set_fail_writes(false);
    assert_eq!(backend.get_stats().await.unwrap().total(), 0);
}

#[tokio::test]
async fn test_mysql_date_range() {
    let (_backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    for timestamp in [
        "2025-08-31T23:59:59Z",
        "2025-09-01T00:00:00Z",
        "2025-09-03T12:00:00Z",
        "2025-09-06T00:00:00Z",
        "2025-09-06T08:00:00Z",
    ] {
        let body = create_alert_json("mysql", timestamp, "warning").to_string();
        dispatcher.dispatch_json(body.as_bytes()).await.unwrap();
    }

    let params = DashboardParams {
        from: Some("2025-09-01".to_string()),
        to: Some("2025-09-06".to_string()),
        alert_type: None,
    };
    let view = load_module_view(store.as_ref(), "mysql", &params)
        .await
        .unwrap();

    // Both bounds are midnight, so the 08:00 alert on the 6th is excluded
    let timestamps: Vec<String> = view
        .alerts
        .iter()
        .map(|alert| alert.common.timestamp.to_rfc3339())
        .collect();
    assert_eq!(
        timestamps,
        vec![
            "2025-09-06T00:00:00+00:00",
            "2025-09-03T12:00:00+00:00",
            "2025-09-01T00:00:00+00:00",
        ]
    );
    assert_eq!(view.series.labels, vec!["2025-09-01", "2025-09-03", "2025-09-06"]);
    assert_eq!(view.series.counts, vec![1, 1, 1]);
}

#[tokio::test]
async fn test_dashboard_caps_results() {
    let (_backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    for _ in 0..(MAX_RESULTS + 20) {
        dispatcher
            .dispatch(create_test_event("host", "cpu_high"))
            .await
            .unwrap();
    }

    let view = load_module_view(store.as_ref(), "host", &DashboardParams::default())
        .await
        .unwrap();

    assert_eq!(view.alerts.len(), MAX_RESULTS);
    // Newest first: ids strictly decrease
    assert!(view.alerts.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(view.series.counts.iter().sum::<usize>(), MAX_RESULTS);
}

#[tokio::test]
async fn test_dashboard_module_and_type_filters() {
    let (_backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    for (module, alert_type) in [
        ("rabbitmq", "critical"),
        ("rabbitmq", "warning"),
        ("nacos", "critical"),
        ("custom", "critical"),
    ] {
        let body = create_alert_json(module, "2025-09-02T10:00:00Z", alert_type).to_string();
        dispatcher.dispatch_json(body.as_bytes()).await.unwrap();
    }

    let rabbitmq = load_module_view(store.as_ref(), "rabbitmq", &DashboardParams::default())
        .await
        .unwrap();
    assert_eq!(rabbitmq.alerts.len(), 2);
    assert!(rabbitmq.alerts.iter().all(|a| a.common.module == "rabbitmq"));

    let critical = DashboardParams {
        alert_type: Some("critical".to_string()),
        ..Default::default()
    };
    let rabbitmq_critical = load_module_view(store.as_ref(), "rabbitmq", &critical)
        .await
        .unwrap();
    assert_eq!(rabbitmq_critical.alerts.len(), 1);

    let general = load_module_view(store.as_ref(), "general", &critical)
        .await
        .unwrap();
    assert_eq!(general.alerts.len(), 3);

    let empty_type = DashboardParams {
        alert_type: Some(String::new()),
        ..Default::default()
    };
    let general_all = load_module_view(store.as_ref(), "general", &empty_type)
        .await
        .unwrap();
    assert_eq!(general_all.alerts.len(), 4);
}

#[tokio::test]
async fn test_unparseable_dates_are_ignored() {
    let (_backend, store) = memory_store();
    let dispatcher = Dispatcher::new(store.clone());

    let body = create_alert_json("redis", "2025-01-15T09:30:00Z", "warning").to_string();
    dispatcher.dispatch_json(body.as_bytes()).await.unwrap();

    let params = DashboardParams {
        from: Some("yesterday".to_string()),
        to: Some("2025/02/01".to_string()),
        alert_type: None,
    };
    let view = load_module_view(store.as_ref(), "redis", &params)
        .await
        .unwrap();
    assert_eq!(view.alerts.len(), 1);
}

#[tokio::test]
async fn test_invalid_dashboard_module() {
    let (_backend, store) = memory_store();

    let result = load_module_view(store.as_ref(), "kafka", &DashboardParams::default()).await;
    assert_matches!(result, Err(Error::Validation(ValidationError::UnknownModule(_))));
}
