use crate::core::error::ValidationError;

/// Longest uuid the platform stores
pub const MAX_UUID_LENGTH: usize = 38;

/// Check a patient or user uuid supplied by an admin request.
///
/// Platform uuids are not always RFC 4122 formatted, so only the character
/// set and length are enforced. The WAL uses `|` as its field separator,
/// which this excludes.
pub fn validate_uuid(uuid: &str) -> Result<&str, ValidationError> {
    let uuid = uuid.trim();

    if uuid.is_empty() {
        return Err(ValidationError::MissingParameter("uuid".to_string()));
    }

    if uuid.len() > MAX_UUID_LENGTH {
        return Err(ValidationError::InvalidLength {
            expected: MAX_UUID_LENGTH,
            actual: uuid.len(),
        });
    }

    if !uuid.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ValidationError::InvalidFormat(format!(
            "uuid '{}' may only contain letters, digits and '-'",
            uuid
        )));
    }

    Ok(uuid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_uuids() {
        assert_eq!(
            validate_uuid("0a9afe04-088b-44ca-9291-0a8c3b5c96fa").unwrap(),
            "0a9afe04-088b-44ca-9291-0a8c3b5c96fa"
        );
        // concept style uuids are longer than RFC 4122
        assert!(validate_uuid("1065AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_ok());
        assert_eq!(validate_uuid("  abc  ").unwrap(), "abc");
    }

    #[test]
    fn test_empty_uuid() {
        assert!(matches!(
            validate_uuid("   "),
            Err(ValidationError::MissingParameter(_))
        ));
    }

    #[test]
    fn test_too_long_uuid() {
        let uuid = "a".repeat(39);
        assert!(matches!(
            validate_uuid(&uuid),
            Err(ValidationError::InvalidLength { expected: 38, actual: 39 })
        ));
    }

    #[test]
    fn test_separator_rejected() {
        assert!(matches!(
            validate_uuid("abc|def"),
            Err(ValidationError::InvalidFormat(_))
        ));
        assert!(validate_uuid("abc,def").is_err());
    }
}
