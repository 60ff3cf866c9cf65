use crate::core::error::AdminError;
use crate::core::state::AppState;
use crate::models::admin::{RecentPatientEntry, RecentPatientsQuery, RecentPatientsResponse};
use crate::recent::last_viewed_patients;
use crate::utils::auth::authorize;
use crate::validation::params::validate_uuid;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// Last viewed patients of a user, most recently viewed first
///
/// GET /user/recent?api_key=<key>&uuid=<user uuid>
pub async fn recent_patients_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentPatientsQuery>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "recent patients")?;

    let uuid = validate_uuid(&params.uuid)?;

    let user = state
        .users
        .get_by_uuid(uuid)
        .ok_or_else(|| AdminError::NotFound("User not found".to_string()))?;

    let patients = last_viewed_patients(&user, state.patients.as_ref())
        .into_iter()
        .filter_map(|patient| {
            patient.id.map(|id| RecentPatientEntry {
                id,
                uuid: patient.uuid.clone(),
            })
        })
        .collect();

    Ok((
        StatusCode::OK,
        Json(RecentPatientsResponse {
            success: true,
            user_uuid: user.uuid.clone(),
            limit: state.config.recent.last_viewed_limit,
            patients,
        }),
    )
        .into_response())
}
