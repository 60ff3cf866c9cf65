use crate::core::error::AdminError;
use crate::core::state::AppState;
use crate::events::bus::{EventMessage, PATIENT_VIEWED_TOPIC};
use crate::models::admin::{ApiKeyQuery, SuccessResponse};
use crate::utils::auth::authorize;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Publish a patient viewed notification.
///
/// POST /event/patient-viewed?api_key=<key>
/// Body: `{"patientUuid": "...", "userUuid": "..."}`
///
/// The payload is passed through as is; missing or unknown uuids are dealt
/// with by the listener, which never reports back. The response only says the
/// event was accepted.
pub async fn patient_viewed_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
    Json(payload): Json<HashMap<String, String>>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "patient viewed event")?;

    let message = EventMessage::new(PATIENT_VIEWED_TOPIC).with_payload(payload);
    let delivered = state.bus.publish(message);

    if delivered == 0 {
        warn!("No listener subscribed, patient viewed event dropped");
    } else {
        debug!(subscribers = delivered, "Patient viewed event published");
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(SuccessResponse {
            success: true,
            message: "Event accepted".to_string(),
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::bus::{PATIENT_UUID_KEY, USER_UUID_KEY};
    use crate::handlers::test_support::{create_test_state, API_KEY};
    use crate::models::patient::Patient;
    use crate::models::user::User;

    fn payload(patient: &str, user: &str) -> HashMap<String, String> {
        HashMap::from([
            (PATIENT_UUID_KEY.to_string(), patient.to_string()),
            (USER_UUID_KEY.to_string(), user.to_string()),
        ])
    }

    fn key() -> Query<ApiKeyQuery> {
        Query(ApiKeyQuery {
            api_key: API_KEY.to_string(),
        })
    }

    #[tokio::test]
    async fn test_event_is_published() {
        let (state, _dir) = create_test_state(3);
        let mut rx = state.bus.subscribe();

        let response = patient_viewed_handler(State(state.clone()), key(), Json(payload("p-1", "u-1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.topic, PATIENT_VIEWED_TOPIC);
        assert_eq!(message.get(PATIENT_UUID_KEY), Some("p-1"));
        assert_eq!(message.get(USER_UUID_KEY), Some("u-1"));
    }

    #[tokio::test]
    async fn test_event_without_listener_is_still_accepted() {
        let (state, _dir) = create_test_state(3);

        let response = patient_viewed_handler(State(state), key(), Json(HashMap::new()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_event_invalid_api_key() {
        let (state, _dir) = create_test_state(3);
        let mut rx = state.bus.subscribe();

        let params = Query(ApiKeyQuery {
            api_key: "nope".to_string(),
        });
        let result = patient_viewed_handler(State(state), params, Json(payload("p-1", "u-1"))).await;

        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::UNAUTHORIZED);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_event_reaches_listener_and_updates_user() {
        let (state, _dir) = create_test_state(3);
        state.patients.add_patient(Patient::new(Some(4), "p-4", false));
        for id in 1..=3 {
            state.patients.add_patient(Patient::new(Some(id), format!("p-{}", id), false));
        }
        state.users.add_user(User::new(1, "u-1").with_last_viewed("1,2,3"));

        let listener = state.patient_viewed_listener();
        let mut receiver = state.bus.subscribe();

        patient_viewed_handler(State(state.clone()), key(), Json(payload("p-4", "u-1")))
            .await
            .unwrap();

        let message = receiver.recv().await.unwrap();
        listener.on_message(&message);

        assert_eq!(
            state.users.get_by_uuid("u-1").unwrap().last_viewed_patient_ids.as_deref(),
            Some("2,3,4")
        );
    }
}
