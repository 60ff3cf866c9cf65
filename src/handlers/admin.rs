use crate::api::client::ApiClient;
use crate::core::error::AdminError;
use crate::core::startup::seed_directories;
use crate::core::state::AppState;
use crate::models::admin::{
    ApiKeyQuery, PatientAddQuery, PatientRemoveQuery, SuccessResponse, UserAddQuery,
    UserRemoveQuery,
};
use crate::models::patient::Patient;
use crate::models::user::User;
use crate::utils::auth::authorize;
use crate::validation::params::validate_uuid;
use crate::wal::wal::WalOperation;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

fn success(message: impl Into<String>) -> Response {
    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: message.into(),
        }),
    )
        .into_response()
}

/// Append to the WAL; the directory change stands even if this fails
fn log_to_wal(state: &AppState, op: WalOperation) {
    if let Err(e) = state.wal.log_operation(op) {
        warn!(error = %e, "Failed to log directory change to WAL");
    }
}

/// Add or replace a patient
///
/// GET /patient/add?api_key=<key>&id=<id>&uuid=<uuid>&voided=<0|1>
pub async fn patient_add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PatientAddQuery>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "patient add")?;

    let uuid = validate_uuid(&params.uuid)?.to_string();
    let voided = params.voided != 0;

    state
        .patients
        .add_patient(Patient::new(params.id, uuid.clone(), voided));

    log_to_wal(
        &state,
        WalOperation::AddPatient {
            id: params.id,
            uuid: uuid.clone(),
            voided,
        },
    );

    info!(patient_id = ?params.id, uuid = %uuid, voided, "Patient added");

    Ok(success("Patient added successfully"))
}

/// GET /patient/remove?api_key=<key>&uuid=<uuid>
pub async fn patient_remove_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PatientRemoveQuery>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "patient remove")?;

    let uuid = validate_uuid(&params.uuid)?.to_string();

    if state.patients.remove_patient(&uuid).is_none() {
        warn!(uuid = %uuid, "Patient not found");
        return Err(AdminError::NotFound("Patient not found".to_string()));
    }

    log_to_wal(&state, WalOperation::RemovePatient { uuid: uuid.clone() });

    info!(uuid = %uuid, "Patient removed");

    Ok(success("Patient removed successfully"))
}

/// Add or replace a user, keeping a last viewed list the user already had
///
/// GET /user/add?api_key=<key>&id=<id>&uuid=<uuid>
pub async fn user_add_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserAddQuery>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "user add")?;

    let uuid = validate_uuid(&params.uuid)?.to_string();

    let mut user = User::new(params.id, uuid.clone());
    if let Some(existing) = state.users.get_by_uuid(&uuid) {
        user.last_viewed_patient_ids = existing.last_viewed_patient_ids.clone();
    }
    state.users.add_user(user);

    log_to_wal(
        &state,
        WalOperation::AddUser {
            id: params.id,
            uuid: uuid.clone(),
        },
    );

    info!(user_id = params.id, uuid = %uuid, "User added");

    Ok(success("User added successfully"))
}

/// GET /user/remove?api_key=<key>&uuid=<uuid>
pub async fn user_remove_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserRemoveQuery>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "user remove")?;

    let uuid = validate_uuid(&params.uuid)?.to_string();

    if state.users.remove_user(&uuid).is_none() {
        warn!(uuid = %uuid, "User not found");
        return Err(AdminError::NotFound("User not found".to_string()));
    }

    log_to_wal(&state, WalOperation::RemoveUser { uuid: uuid.clone() });

    info!(uuid = %uuid, "User removed");

    Ok(success("User removed successfully"))
}

/// Reload patients and users from the external API and start a fresh WAL.
///
/// The directories are only replaced once the fetch has succeeded. The WAL is
/// truncated before reseeding, so updates stored while the new data is loaded
/// stay in the log.
///
/// POST /reload?api_key=<key>
pub async fn reload_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, AdminError> {
    authorize(&params.api_key, &state.config.sync.api_key, "reload")?;

    info!("Starting directory reload from external API");

    let api_client = ApiClient::new(
        state.config.sync.data_endpoint.clone(),
        state.config.sync.api_key.clone(),
    )
    .map_err(|e| AdminError::ApiClientError(e.to_string()))?;

    let api_data = api_client.fetch_data().await.map_err(|e| {
        warn!(error = %e, "Reload aborted, keeping current directories");
        AdminError::ExternalApiError(format!("{:#}", e))
    })?;

    state
        .wal
        .truncate()
        .map_err(|e| AdminError::WalError(e.to_string()))?;

    state.patients.clear();
    state.users.clear();
    seed_directories(&state, api_data);

    info!(
        patients = state.patients.len(),
        users = state.users.len(),
        "Directory reload completed successfully"
    );

    Ok(success(format!(
        "Reload successful: {} patients, {} users",
        state.patients.len(),
        state.users.len()
    )))
}
