// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{admin, events, fallback, health, metrics, recent};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Admin endpoints (require API key)
        .route("/metrics", get(metrics::metrics_handler))
        .route("/event/patient-viewed", post(events::patient_viewed_handler))
        .route("/user/recent", get(recent::recent_patients_handler))
        .route("/reload", post(admin::reload_handler))
        .route("/patient/add", get(admin::patient_add_handler))
        .route("/patient/remove", get(admin::patient_remove_handler))
        .route("/user/add", get(admin::user_add_handler))
        .route("/user/remove", get(admin::user_remove_handler))
        .fallback(fallback::fallback_handler)
        .with_state(state)
}
