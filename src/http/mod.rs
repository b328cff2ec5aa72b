pub mod credentials;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ResponseShape};
use crate::tracker::TrackerFactory;

/// Everything a request needs, fixed at startup.
#[derive(Clone)]
pub struct AppState {
    pub trackers: Arc<dyn TrackerFactory>,
    pub fallback_api_key: Option<String>,
    pub shape: ResponseShape,
    pub cache_max_age_secs: u64,
}

impl AppState {
    pub fn from_config(config: &AppConfig, trackers: Arc<dyn TrackerFactory>) -> Self {
        Self {
            trackers,
            fallback_api_key: config.linear.api_key.clone(),
            shape: config.response.shape,
            cache_max_age_secs: config.response.cache_max_age_secs,
        }
    }
}

/// Routes:
/// - `ANY /api/linear-issues` - snapshot of the caller's open cycle work (GET only)
/// - `GET /health` - liveness
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/linear-issues", any(handlers::linear_issues))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
