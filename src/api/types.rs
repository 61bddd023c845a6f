//! API response types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alert::StoredAlert;
use crate::query::{DailySeries, DashboardModule, ModuleView};
use crate::storage::InsertedAlert;

/// Line colour used for the alert count dataset
const CHART_COLOR: &str = "#3b82f6";

/// Response for `POST /api/alerts`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreResponse {
    pub status: String,
    pub id: i64,
    pub collection: String,
}

impl From<InsertedAlert> for StoreResponse {
    fn from(inserted: InsertedAlert) -> Self {
        Self {
            status: "stored".to_string(),
            id: inserted.id,
            collection: inserted.kind.collection().to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub storage: String,
}

/// Per-collection row counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub timestamp: String,
    pub backend: String,
    pub total_alerts: u64,
    pub collections: BTreeMap<String, u64>,
}

/// One Chart.js dataset
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<usize>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
}

/// Chart.js `data` object for the daily alert count line chart
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl From<DailySeries> for ChartData {
    fn from(series: DailySeries) -> Self {
        Self {
            labels: series.labels,
            datasets: vec![ChartDataset {
                label: "Alert Count".to_string(),
                data: series.counts,
                border_color: CHART_COLOR.to_string(),
                background_color: CHART_COLOR.to_string(),
                fill: false,
            }],
        }
    }
}

/// Response for `GET /dashboard/:module`
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub module: DashboardModule,
    pub count: usize,
    pub alerts: Vec<StoredAlert>,
    pub chart_data: ChartData,
}

impl From<ModuleView> for DashboardResponse {
    fn from(view: ModuleView) -> Self {
        Self {
            module: view.module,
            count: view.alerts.len(),
            alerts: view.alerts,
            chart_data: view.series.into(),
        }
    }
}
