// Centralized error handling for the service

use crate::models::admin::ErrorResponse;
use crate::models::user::UserId;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Errors that abandon a patient viewed event
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Message is missing required key: {0}")]
    MissingKey(&'static str),

    #[error("Failed to find patient with uuid: {0}")]
    PatientNotFound(String),

    #[error("Failed to store last viewed patients for user {user_id}: {source}")]
    Persistence {
        user_id: UserId,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to create API client: {0}")]
    ApiClientError(String),

    #[error("Failed to fetch data from external API: {0}")]
    ExternalApiError(String),

    #[error("Failed to write to WAL: {0}")]
    WalError(String),
}

impl From<ValidationError> for AdminError {
    fn from(e: ValidationError) -> Self {
        AdminError::InvalidParameter(e.to_string())
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AdminError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::ApiClientError(_)
            | AdminError::ExternalApiError(_)
            | AdminError::WalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Error, Debug)]
pub enum MonitoringError {
    #[error("Invalid API key")]
    InvalidApiKey,
}

impl From<AdminError> for MonitoringError {
    fn from(_: AdminError) -> Self {
        MonitoringError::InvalidApiKey
    }
}

impl IntoResponse for MonitoringError {
    fn into_response(self) -> Response {
        match self {
            MonitoringError::InvalidApiKey => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter format: {0}")]
    InvalidFormat(String),

    #[error("Invalid length: expected at most {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_error_status_codes() {
        let cases = [
            (AdminError::InvalidApiKey, StatusCode::UNAUTHORIZED),
            (AdminError::InvalidParameter("x".into()), StatusCode::BAD_REQUEST),
            (AdminError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AdminError::WalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_validation_error_becomes_bad_request() {
        let error: AdminError = ValidationError::MissingParameter("uuid".into()).into();
        assert_eq!(
            error.to_string(),
            "Invalid parameter: Missing required parameter: uuid"
        );
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_event_error_messages() {
        assert_eq!(
            EventError::PatientNotFound("abc".into()).to_string(),
            "Failed to find patient with uuid: abc"
        );

        let error = EventError::Persistence {
            user_id: 5,
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(
            error.to_string(),
            "Failed to store last viewed patients for user 5: disk full"
        );
    }
}
