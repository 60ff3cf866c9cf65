use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::client::{ApiClient, ApiData};
use crate::core::state::AppState;
use crate::models::{patient::Patient, user::User};
use crate::validation::params::validate_uuid;
use crate::wal::wal::WalOperation;

/// Apply WAL operations on top of the directories, in log order.
///
/// Returns the number of operations that could not be applied.
pub fn apply_wal_operations(state: &AppState, operations: &[WalOperation]) -> usize {
    let mut unapplied = 0;

    for op in operations {
        match op {
            WalOperation::AddPatient { id, uuid, voided } => {
                state.patients.add_patient(Patient::new(*id, uuid.clone(), *voided));
            }
            WalOperation::RemovePatient { uuid } => {
                state.patients.remove_patient(uuid);
            }
            WalOperation::AddUser { id, uuid } => {
                // keep a last viewed value the user already had
                let mut user = User::new(*id, uuid.clone());
                if let Some(existing) = state.users.get_by_uuid(uuid) {
                    user.last_viewed_patient_ids = existing.last_viewed_patient_ids.clone();
                }
                state.users.add_user(user);
            }
            WalOperation::RemoveUser { uuid } => {
                state.users.remove_user(uuid);
            }
            WalOperation::SetLastViewed { user_id, value } => {
                if !state.users.set_last_viewed(*user_id, value.clone()) {
                    warn!(user_id = *user_id, "WAL references unknown user, skipping last viewed update");
                    unapplied += 1;
                }
            }
        }
    }

    unapplied
}

/// Seed the directories from the external data endpoint
pub async fn populate_from_api(state: &AppState, api_client: &ApiClient) -> Result<()> {
    let api_data = api_client
        .fetch_data()
        .await
        .context("Failed to fetch data from external API")?;

    info!(
        patients = api_data.patients.len(),
        users = api_data.users.len(),
        "Data fetched from external API"
    );

    seed_directories(state, api_data);

    Ok(())
}

/// Add fetched patients and users to the directories, skipping invalid uuids
pub fn seed_directories(state: &AppState, api_data: ApiData) {
    for api_patient in api_data.patients {
        match validate_uuid(&api_patient.uuid) {
            Ok(uuid) => {
                state
                    .patients
                    .add_patient(Patient::new(api_patient.id, uuid, api_patient.voided));
            }
            Err(e) => {
                warn!(
                    patient_id = ?api_patient.id,
                    uuid = %api_patient.uuid,
                    error = %e,
                    "Invalid patient uuid, skipping patient"
                );
            }
        }
    }

    for api_user in api_data.users {
        match validate_uuid(&api_user.uuid) {
            Ok(uuid) => {
                let mut user = User::new(api_user.id, uuid);
                user.last_viewed_patient_ids = api_user.last_viewed_patient_ids;
                state.users.add_user(user);
            }
            Err(e) => {
                warn!(
                    user_id = api_user.id,
                    uuid = %api_user.uuid,
                    error = %e,
                    "Invalid user uuid, skipping user"
                );
            }
        }
    }

    info!(
        patients_cached = state.patients.len(),
        users_cached = state.users.len(),
        "Directories populated from external API"
    );
}
