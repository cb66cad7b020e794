use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use scoreqr_core::health::{healthz, readyz};
use scoreqr_core::middleware::request_id_layer;

use crate::handlers::{
    admin::{create_code, delete_code, get_code, list_codes},
    status::status,
    sync::sync_codes,
    verify::verify_code,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Public API
        .route("/api/verify/{code}", get(verify_code))
        .route("/api/sync-codes", post(sync_codes))
        .route("/api/status", get(status))
        // Admin API (x-api-key header)
        .route("/admin/codes", get(list_codes))
        .route("/admin/codes", post(create_code))
        .route("/admin/codes/{code}", get(get_code))
        .route("/admin/codes/{code}", delete(delete_code))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
