use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct PatientAddQuery {
    pub api_key: String,
    /// Omitted for patients that have not been saved yet
    pub id: Option<u32>,
    pub uuid: String,
    #[serde(default)]
    pub voided: u8,
}

#[derive(Deserialize)]
pub struct PatientRemoveQuery {
    pub api_key: String,
    pub uuid: String,
}

#[derive(Deserialize)]
pub struct UserAddQuery {
    pub api_key: String,
    pub id: u32,
    pub uuid: String,
}

#[derive(Deserialize)]
pub struct UserRemoveQuery {
    pub api_key: String,
    pub uuid: String,
}

#[derive(Deserialize)]
pub struct RecentPatientsQuery {
    pub api_key: String,
    pub uuid: String,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentPatientEntry {
    pub id: u32,
    pub uuid: String,
}

/// Last viewed patients of a user, most recently viewed first
#[derive(Debug, Serialize, Deserialize)]
pub struct RecentPatientsResponse {
    pub success: bool,
    pub user_uuid: String,
    pub limit: usize,
    pub patients: Vec<RecentPatientEntry>,
}
