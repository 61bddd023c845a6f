//! Alert ingestion and per-module dashboards for monitoring probes
//!
//! Probes (Redis, MySQL, host and system checks) `POST` alert events as JSON.
//! The [`dispatch::Dispatcher`] validates each event and stores it in the
//! collection of its module; [`query`] serves the newest alerts of a module
//! together with a per-day count series for charting.

pub mod alert;
pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod query;
pub mod storage;
pub mod validate;

pub use alert::{AlertEvent, ModuleKind, NewAlert, StoredAlert};
pub use dispatch::Dispatcher;
pub use error::Error;
