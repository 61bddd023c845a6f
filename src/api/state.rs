//! API shared state

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::storage::AlertStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Writes incoming alerts
    pub dispatcher: Dispatcher,

    /// Read side of the same backend the dispatcher writes to
    pub store: Arc<dyn AlertStore>,
}

impl ApiState {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&store)),
            store,
        }
    }
}
