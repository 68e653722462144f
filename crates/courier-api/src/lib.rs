//! # courier-api
//!
//! HTTP API layer for Courier built on Axum.
//!
//! Provides the health endpoints, the WebSocket upgrade, middleware
//! (CORS, logging), DTOs, and the application builder.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::AppState;
