use std::sync::Arc;

use crate::services::MovieStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MovieStore>,
}

impl AppState {
    pub fn new(store: Arc<MovieStore>) -> Self {
        Self { store }
    }
}
