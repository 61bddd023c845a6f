//! Per-module alert listing and daily counts for the dashboard
//!
//! A dashboard request names one of seven modules. Four of them have their own
//! collection; `general`, `rabbitmq` and `nacos` are read from the general
//! collection, the latter two restricted to rows carrying their module name.
//!
//! Results are the newest [`MAX_RESULTS`] matching records plus a
//! [`DailySeries`] counting those records per calendar day (UTC).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

use crate::alert::{ModuleKind, StoredAlert};
use crate::error::Result;
use crate::storage::{AlertFilter, AlertStore};
use crate::validate::ValidationError;

/// Upper bound on records returned for one dashboard
pub const MAX_RESULTS: usize = 100;

/// Date format of the `from` / `to` parameters and of series labels
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Modules a dashboard can be requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DashboardModule {
    Redis,
    #[serde(rename = "mysql")]
    MySql,
    Host,
    System,
    General,
    #[serde(rename = "rabbitmq")]
    RabbitMq,
    Nacos,
}

impl DashboardModule {
    pub const ALL: [DashboardModule; 7] = [
        DashboardModule::Redis,
        DashboardModule::MySql,
        DashboardModule::Host,
        DashboardModule::System,
        DashboardModule::General,
        DashboardModule::RabbitMq,
        DashboardModule::Nacos,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }

    /// Like [`DashboardModule::from_name`], failing for unknown names
    pub fn parse(name: &str) -> std::result::Result<Self, ValidationError> {
        Self::from_name(name).ok_or_else(|| ValidationError::UnknownModule(name.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardModule::Redis => "redis",
            DashboardModule::MySql => "mysql",
            DashboardModule::Host => "host",
            DashboardModule::System => "system",
            DashboardModule::General => "general",
            DashboardModule::RabbitMq => "rabbitmq",
            DashboardModule::Nacos => "nacos",
        }
    }

    /// Collection to read and the `module` value rows must carry, if any
    pub fn source(&self) -> (ModuleKind, Option<&'static str>) {
        match self {
            DashboardModule::Redis => (ModuleKind::Redis, None),
            DashboardModule::MySql => (ModuleKind::MySql, None),
            DashboardModule::Host => (ModuleKind::Host, None),
            DashboardModule::System => (ModuleKind::System, None),
            DashboardModule::General => (ModuleKind::General, None),
            DashboardModule::RabbitMq => (ModuleKind::General, Some("rabbitmq")),
            DashboardModule::Nacos => (ModuleKind::General, Some("nacos")),
        }
    }
}

impl std::fmt::Display for DashboardModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw dashboard query parameters
///
/// Unparseable dates are ignored rather than rejected; an empty `alert_type`
/// means no type filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub alert_type: Option<String>,
}

impl DashboardParams {
    /// Storage filter for `module`, capped at [`MAX_RESULTS`]
    pub fn to_filter(&self, module: DashboardModule) -> AlertFilter {
        let (_, module_filter) = module.source();

        AlertFilter {
            module: module_filter.map(str::to_string),
            from: self.from.as_deref().and_then(|v| parse_day("from", v)),
            to: self.to.as_deref().and_then(|v| parse_day("to", v)),
            alert_type: self.alert_type.clone().filter(|t| !t.is_empty()),
            limit: MAX_RESULTS,
        }
    }
}

/// Midnight (UTC) of a `YYYY-MM-DD` date
fn parse_day(param: &str, value: &str) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(value, DAY_FORMAT) {
        Ok(day) => day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(e) => {
            warn!("ignoring unparseable {param} date {value:?}: {e}");
            None
        }
    }
}

/// Alert counts per calendar day, ascending by day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl DailySeries {
    pub fn from_alerts(alerts: &[StoredAlert]) -> Self {
        let mut days: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for alert in alerts {
            *days.entry(alert.common.timestamp.date_naive()).or_default() += 1;
        }

        let (labels, counts) = days
            .into_iter()
            .map(|(day, count)| (day.format(DAY_FORMAT).to_string(), count))
            .unzip();

        Self { labels, counts }
    }
}

/// Everything a module dashboard shows
#[derive(Debug, Clone, Serialize)]
pub struct ModuleView {
    pub module: DashboardModule,
    pub alerts: Vec<StoredAlert>,
    pub series: DailySeries,
}

/// Load the dashboard data for a module name
#[instrument(skip(store, params))]
pub async fn load_module_view(
    store: &dyn AlertStore,
    module: &str,
    params: &DashboardParams,
) -> Result<ModuleView> {
    let module = DashboardModule::parse(module).inspect_err(|_| {
        warn!("invalid module requested");
    })?;

    let (kind, _) = module.source();
    let alerts = store
        .query_alerts(kind, params.to_filter(module))
        .await
        .inspect_err(|e| error!(%module, "failed to query alerts: {e}"))?;

    let series = DailySeries::from_alerts(&alerts);

    Ok(ModuleView {
        module,
        alerts,
        series,
    })
}
