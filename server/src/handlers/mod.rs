pub mod url;

use crate::AppState;
use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness probe, touches neither the store nor the provider
        .route("/health", get(|| async { StatusCode::OK }))
        .route("/geturl", get(url::get_url))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
