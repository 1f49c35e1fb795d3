//! Pipeline Monitor
//!
//! Aggregation backend for the pipeline-defect dashboard. Raw inspection
//! records are pulled from the inspection-data API, normalized into one
//! taxonomy and projected into dashboard views.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    PIPELINE MONITOR                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  API      │  │  Read     │  │  View builders          │ │
//! │  │  Router   │─►│  Pipeline │─►│  (taxonomy, aggregates) │ │
//! │  │  (Axum)   │  │ +fallback │  │                         │ │
//! │  └─────┬─────┘  └─────┬─────┘  └─────────────────────────┘ │
//! │        │ writes       │ reads                               │
//! │        ▼              ▼                                     │
//! │             ┌──────────────────┐                            │
//! │             │ InspectionSource │                            │
//! │             └────────┬─────────┘                            │
//! └──────────────────────┼──────────────────────────────────────┘
//!                        ▼
//!               inspection-data API
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod models;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put, delete},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use config::Config;
pub use error::{AppError, AppResult};

use ingest::InspectionSource;
use models::DefectQuery;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn InspectionSource>,
    pub config: Config,
}

impl AppState {
    pub fn new(source: Arc<dyn InspectionSource>, config: Config) -> Self {
        Self { source, config }
    }

    /// Upstream query every read pipeline starts from
    pub fn fetch_query(&self) -> DefectQuery {
        DefectQuery::with_limit(self.config.fetch_limit)
    }
}

/// Create the main router with all routes
pub fn build_router(state: AppState) -> Router {
    // Read routes (no auth required, fail open)
    let read_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/login", post(handlers::auth::login))

        // Dashboard
        .route("/api/v1/dashboard", get(handlers::dashboard::overview))
        .route("/api/v1/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/v1/dashboard/criticality", get(handlers::dashboard::criticality))
        .route("/api/v1/dashboard/methods", get(handlers::dashboard::methods))
        .route("/api/v1/summary", get(handlers::dashboard::summary))

        // Map and notifications
        .route("/api/v1/map/points", get(handlers::map::points))
        .route("/api/v1/notifications", get(handlers::notifications::list))

        // Objects
        .route("/api/v1/objects", get(handlers::objects::list))
        .route("/api/v1/objects/compare", get(handlers::objects::compare))
        .route("/api/v1/objects/:segment", get(handlers::objects::get))

        // Analytics
        .route("/api/v1/analytics/trends", get(handlers::analytics::trends))
        .route("/api/v1/analytics/recommendations", get(handlers::analytics::recommendations))

        .route("/api/v1/defects", get(handlers::defects::list));

    // Write routes (bearer credential, fail closed)
    let write_routes = Router::new()
        .route("/api/v1/defects", post(handlers::defects::create))
        .route("/api/v1/defects/:id", put(handlers::defects::update))
        .route("/api/v1/defects/:id", delete(handlers::defects::delete))

        .route("/api/v1/tasks", post(handlers::tasks::create))
        .route("/api/v1/tasks/:id", put(handlers::tasks::update))
        .route("/api/v1/tasks/:id", delete(handlers::tasks::delete))

        .route("/api/v1/favorites", post(handlers::favorites::add))
        .route("/api/v1/favorites/:id", delete(handlers::favorites::remove))

        .route("/api/v1/profile", put(handlers::profile::update_profile))
        .route("/api/v1/settings", put(handlers::profile::update_settings))

        .layer(axum_middleware::from_fn(middleware::auth::require_credential));

    // Combine all routes
    Router::new()
        .merge(read_routes)
        .merge(write_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
