//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use courier_core::config::AppConfig;
use courier_realtime::engine::RelayEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Relay engine
    pub relay: Arc<RelayEngine>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(config: Arc<AppConfig>, relay: Arc<RelayEngine>) -> Self {
        Self { config, relay }
    }
}
