//! Storage backends for alert persistence
//!
//! This module provides a trait-based abstraction for storing alerts.
//!
//! ## Design
//!
//! - **Trait-based**: `AlertStore` trait allows swapping implementations
//! - **Async**: All operations are async so handlers can share one backend
//! - **One record, one transaction**: every insert commits or leaves nothing
//!
//! ## Backends
//!
//! - **SQLite** (default): Embedded database, one table per alert collection
//! - **In-Memory**: No persistence, for testing or storage-less runs
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use monitor_web::storage::{AlertStore, sqlite::SqliteBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend: Arc<dyn AlertStore> = Arc::new(SqliteBackend::new("./alerts.db").await?);
//!     // Hand to the Dispatcher and the API state
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod error;
pub mod memory;
pub mod schema;
#[cfg(feature = "storage-sqlite")]
pub mod sqlite;

pub use backend::{AlertFilter, AlertStore, CollectionStats, HealthStatus, InsertedAlert};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryBackend;
