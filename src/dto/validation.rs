//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest username accepted from the identity layer.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Validates a username: 1 to 150 characters among letters, digits and `@.+_-`.
///
/// # Examples
///
/// ```ignore
/// validate_username("alice")        // Ok
/// validate_username("a.b+c@d_e-f")  // Ok
/// validate_username("")             // Err - empty
/// validate_username("bad name")     // Err - space
/// ```
pub fn validate_username(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length == 0 || length > MAX_USERNAME_LENGTH {
        let mut err = ValidationError::new("username_length");
        err.message = Some(
            format!("Username must be 1 to {MAX_USERNAME_LENGTH} characters (got {length})")
                .into(),
        );
        return Err(err);
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '_' | '-'))
    {
        let mut err = ValidationError::new("username_format");
        err.message = Some("Username may only contain letters, digits and @.+_-".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b+c@d_e-f").is_ok());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_username_invalid_length() {
        assert!(validate_username("").is_err());
        assert!(validate_username(&"x".repeat(MAX_USERNAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_username_invalid_format() {
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("semi;colon").is_err());
        assert!(validate_username("slash/").is_err());
    }
}
