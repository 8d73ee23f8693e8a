//! graha-rg library interface
//!
//! Exposes the report-generation pipeline for integration testing: fact
//! aggregation, resilient extraction, compatibility scoring, layout, and
//! assembly.

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod extract;
pub mod i18n;
pub mod layout;
pub mod render;
pub mod scoring;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::assets::AssetCache;
use crate::services::fact_client::FactProvider;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Computation provider boundary
    pub provider: Arc<dyn FactProvider>,
    /// Process-local static asset cache
    pub assets: Arc<AssetCache>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(provider: Arc<dyn FactProvider>, assets: Arc<AssetCache>) -> Self {
        Self {
            provider,
            assets,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::report_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
