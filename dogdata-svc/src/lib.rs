//! dogdata-svc library - per-breed age-band reference data
//!
//! Exposes the router and services for the binary and integration tests.

use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validators;

pub use crate::error::{Error, Result};

use crate::services::AgeBandService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record lifecycle service (owns the repository)
    pub service: AgeBandService,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: AgeBandService) -> Self {
        Self {
            service,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::dogs_data_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
