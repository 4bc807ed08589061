//! Application state for the HTTP server.

use crate::services::TransitEngine;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: TransitEngine,
}

impl AppState {
    pub fn new(engine: TransitEngine) -> Self {
        Self { engine }
    }
}
