//! Alert dispatcher
//!
//! Takes a decoded [`AlertEvent`], validates it, maps it onto the record shape
//! of its module and writes that single record through the shared
//! [`AlertStore`].
//!
//! ## Routing
//!
//! The module name is resolved to a [`ModuleKind`] by exact match. Names
//! without a dedicated shape land in the general collection; if the name is not
//! one of the dashboard modules served from there either, a warning is logged.
//!
//! ## Atomicity
//!
//! The insert runs on its own task. Dropping the future returned by
//! [`Dispatcher::dispatch`] (e.g. because the client went away) does not abort
//! the write half-way: the task still runs to commit or rollback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::alert::{AlertCommon, AlertEvent, ModuleFields, ModuleKind, NewAlert};
use crate::error::Result;
use crate::query::DashboardModule;
use crate::storage::{AlertStore, InsertedAlert, StorageError};
use crate::validate::{decode_event, validate_event};

/// Routes validated alert events into their module's collection
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn AlertStore>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// Collection kind for an event's module name
    pub fn route(module: &str) -> ModuleKind {
        match ModuleKind::from_module_name(module) {
            Some(kind) => kind,
            None => {
                if DashboardModule::from_name(module).is_some() {
                    debug!(module, "routing alert to general collection");
                } else {
                    warn!(module, "unrecognized module, routing alert to general collection");
                }
                ModuleKind::General
            }
        }
    }

    /// Map an event onto the record written for it
    ///
    /// `received_at` stands in for a missing event timestamp.
    pub fn build_record(event: &AlertEvent, received_at: DateTime<Utc>) -> NewAlert {
        let kind = Self::route(&event.module);

        NewAlert {
            common: AlertCommon {
                timestamp: event.timestamp.unwrap_or(received_at),
                module: event.module.clone(),
                service_name: event.service_name.clone(),
                event_name: event.event_name.clone(),
                details: event.details.clone(),
                host_ip: event.host_ip.clone(),
                alert_type: event.alert_type.clone(),
                cluster_name: event.cluster_name.clone(),
                hostname: event.hostname.clone(),
            },
            fields: ModuleFields::from_event(kind, event),
        }
    }

    /// Decode a raw request body and dispatch it
    pub async fn dispatch_json(&self, body: &[u8]) -> Result<InsertedAlert> {
        let event = decode_event(body)?;
        self.dispatch(event).await
    }

    /// Validate an event and persist exactly one record for it
    #[instrument(skip_all, fields(module = %event.module, event_name = %event.event_name))]
    pub async fn dispatch(&self, event: AlertEvent) -> Result<InsertedAlert> {
        let event = validate_event(event)?;
        let record = Self::build_record(&event, Utc::now());

        let store = Arc::clone(&self.store);
        let inserted = tokio::spawn(async move { store.insert_alert(record).await })
            .await
            .map_err(|e| StorageError::BackendError(format!("insert task failed: {}", e)))
            .and_then(|result| result)
            .inspect_err(|e| {
                error!(
                    module = %event.module,
                    event_name = %event.event_name,
                    "failed to store alert: {e}"
                )
            })?;

        info!(
            module = %event.module,
            event_name = %event.event_name,
            collection = inserted.kind.collection(),
            id = inserted.id,
            "stored alert"
        );

        Ok(inserted)
    }
}
