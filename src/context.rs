use std::sync::Arc;

use crate::db::Store;

/// shared state handed to every bot handler and http route at wiring time
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn Store>,
}

impl AppContext {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}
