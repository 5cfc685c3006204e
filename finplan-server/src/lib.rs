//! finplan-server library - questionnaire, plan gating and analysis service

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod analysis_client;
pub mod api;
pub mod error;
pub mod rate_limit;

use analysis_client::AnalysisProvider;
use rate_limit::AnalysisRateLimiter;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// External analysis collaborator
    pub provider: Arc<dyn AnalysisProvider>,
    /// Per-user analysis throttle
    pub limiter: Arc<AnalysisRateLimiter>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        provider: Arc<dyn AnalysisProvider>,
        limiter: AnalysisRateLimiter,
    ) -> Self {
        Self {
            db,
            provider,
            limiter: Arc::new(limiter),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let users = Router::new()
        .route(
            "/api/users/:user_id/questionnaire",
            get(api::get_questionnaire).put(api::put_questionnaire),
        )
        .route("/api/users/:user_id/plan", get(api::get_plan))
        .route(
            "/api/users/:user_id/sections/:section_id",
            get(api::get_section_access),
        )
        .route("/api/users/:user_id/snapshot", get(api::get_snapshot))
        .route("/api/users/:user_id/analysis", post(api::run_analysis))
        .route(
            "/api/users/:user_id/analysis/preview",
            get(api::preview_analysis_request),
        )
        .route(
            "/api/users/:user_id/analysis/latest",
            get(api::get_latest_analysis),
        );

    Router::new()
        .merge(users)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
