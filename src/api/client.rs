use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::time::Duration;

/// Hard stop for paginated fetches
const MAX_PAGES: u32 = 1000;

/// Client for the platform endpoint that exports patients and users
pub struct ApiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiData {
    #[serde(default)]
    pub patients: Vec<ApiPatient>,
    #[serde(default)]
    pub users: Vec<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPatient {
    /// Absent for patients that have not been saved
    #[serde(default)]
    pub id: Option<u32>,
    pub uuid: String,
    #[serde(default)]
    pub voided: bool,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub id: u32,
    pub uuid: String,
    /// Stored last viewed property, comma-separated ids
    #[serde(default)]
    pub last_viewed_patient_ids: Option<String>,
}

impl ApiClient {
    pub fn new(endpoint: String, api_key: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Fetch patients and users, following pages until one comes back empty
    pub async fn fetch_data(&self) -> Result<ApiData> {
        let mut all_patients = Vec::new();
        let mut all_users = Vec::new();
        let mut page = 1;

        loop {
            let response = self
                .client
                .get(&self.endpoint)
                .query(&[("api_key", &self.api_key), ("page", &page.to_string())])
                .send()
                .await
                .context("Failed to send request to external API")?;

            if !response.status().is_success() {
                bail!("External API returned error status: {}", response.status());
            }

            let data = response
                .json::<ApiData>()
                .await
                .context("Failed to parse JSON response from external API")?;

            let has_more = !data.patients.is_empty() || !data.users.is_empty();

            all_patients.extend(data.patients);
            all_users.extend(data.users);

            if !has_more {
                break;
            }

            page += 1;

            if page > MAX_PAGES {
                bail!("Too many pages (>{}), possible infinite loop", MAX_PAGES);
            }
        }

        Ok(ApiData {
            patients: all_patients,
            users: all_users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_creation() {
        let client = ApiClient::new(
            "http://localhost:8000/api/recent-patients/data".to_string(),
            "test-api-key".to_string(),
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_api_data_deserialization() {
        let json = r#"{
            "patients": [
                {"id": 1, "uuid": "p-1"},
                {"uuid": "p-unsaved"},
                {"id": 3, "uuid": "p-3", "voided": true}
            ],
            "users": [
                {"id": 9, "uuid": "u-9", "last_viewed_patient_ids": "1,3"},
                {"id": 10, "uuid": "u-10"}
            ],
            "timestamp": 1699564800
        }"#;

        let data: ApiData = serde_json::from_str(json).unwrap();

        assert_eq!(data.patients.len(), 3);
        assert_eq!(data.patients[1].id, None);
        assert!(data.patients[2].voided);
        assert_eq!(data.users[0].last_viewed_patient_ids.as_deref(), Some("1,3"));
        assert!(data.users[1].last_viewed_patient_ids.is_none());
    }

    #[test]
    fn test_empty_page_deserialization() {
        let data: ApiData = serde_json::from_str("{}").unwrap();
        assert!(data.patients.is_empty());
        assert!(data.users.is_empty());
    }
}
