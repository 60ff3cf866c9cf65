use crate::core::error::AdminError;
use axum::{
    http::Uri,
    response::{IntoResponse, Response},
};

pub async fn fallback_handler(uri: Uri) -> Response {
    AdminError::NotFound(format!("No route for {}", uri.path())).into_response()
}
