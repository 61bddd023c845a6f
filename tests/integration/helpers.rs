//! Helper functions for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use monitor_web::{
    AlertEvent,
    storage::{AlertStore, MemoryBackend},
};

pub fn memory_store() -> (Arc<MemoryBackend>, Arc<dyn AlertStore>) {
    let backend = Arc::new(MemoryBackend::new());
    let store: Arc<dyn AlertStore> = backend.clone();
    (backend, store)
}

pub fn create_test_event(module: &str, event_name: &str) -> AlertEvent {
    AlertEvent {
        module: module.to_string(),
        service_name: format!("{module}-service"),
        event_name: event_name.to_string(),
        alert_type: "warning".to_string(),
        host_ip: "10.0.0.1".to_string(),
        ..Default::default()
    }
}

/// Alert event JSON with an explicit RFC 3339 timestamp
pub fn create_alert_json(module: &str, timestamp: &str, alert_type: &str) -> serde_json::Value {
    serde_json::json!({
        "timestamp": timestamp,
        "module": module,
        "service_name": format!("{module}-service"),
        "event_name": "threshold_exceeded",
        "details": "value above limit",
        "host_ip": "10.0.0.1",
        "alert_type": alert_type,
        "cluster_name": "prod",
        "hostname": "node-1"
    })
}
