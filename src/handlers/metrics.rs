// Metrics endpoint

use crate::core::error::MonitoringError;
use crate::core::state::AppState;
use crate::models::admin::ApiKeyQuery;
use crate::utils::auth::authorize;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Returns JSON with event counters, directory sizes and uptime.
///
/// GET /metrics?api_key=<key>
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, MonitoringError> {
    authorize(&params.api_key, &state.config.sync.api_key, "metrics")?;

    let snapshot = state.metrics.get_snapshot(&state.patients, &state.users);

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{body_json, create_test_state, API_KEY};
    use crate::metrics::collector::MetricsSnapshot;
    use crate::models::user::User;

    #[tokio::test]
    async fn test_metrics_snapshot() {
        let (state, _dir) = create_test_state(3);
        state.users.add_user(User::new(1, "u-1"));
        state.metrics.increment_received();
        state.metrics.increment_updated();

        let params = ApiKeyQuery {
            api_key: API_KEY.to_string(),
        };
        let response = metrics_handler(State(state), Query(params)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: MetricsSnapshot = body_json(response).await;
        assert_eq!(snapshot.events_received, 1);
        assert_eq!(snapshot.events_updated, 1);
        assert_eq!(snapshot.users, 1);
    }

    #[tokio::test]
    async fn test_metrics_invalid_api_key() {
        let (state, _dir) = create_test_state(3);
        let params = ApiKeyQuery {
            api_key: "wrong".to_string(),
        };

        let result = metrics_handler(State(state), Query(params)).await;
        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
