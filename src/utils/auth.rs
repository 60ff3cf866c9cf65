use crate::core::error::AdminError;
use tracing::warn;

/// Compare two keys without short-circuiting on the first differing byte
fn keys_match(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    let diff = provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    diff == 0
}

/// Check the `api_key` of an admin request against the configured key
pub fn authorize(provided: &str, expected: &str, action: &str) -> Result<(), AdminError> {
    if keys_match(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        warn!(action, "Unauthorized request");
        Err(AdminError::InvalidApiKey)
    }
}
