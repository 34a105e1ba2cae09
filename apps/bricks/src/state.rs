use std::sync::Arc;

use crate::hydrate::Hydrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Page pipeline; owns the process-wide component registry and content cache.
    pub hydrator: Arc<Hydrator>,
}

impl AppState {
    pub fn new(hydrator: Hydrator) -> Self {
        Self {
            hydrator: Arc::new(hydrator),
        }
    }
}
