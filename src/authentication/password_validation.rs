use secrecy::{ExposeSecret, Secret};
use std::borrow::Cow;
use validator::ValidationError;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 50;

/// Validation result for password checks
#[derive(Debug, PartialEq)]
pub enum PasswordValidationError {
    TooShort,
    TooLong,
}

/// Validates that a password meets length requirements
///
/// Requirements:
/// - At least MIN_PASSWORD_LENGTH characters
/// - At most MAX_PASSWORD_LENGTH characters
pub fn validate_password_length(password: &Secret<String>) -> Result<(), PasswordValidationError> {
    let length = password.expose_secret().chars().count();

    if length < MIN_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooShort);
    }

    if length > MAX_PASSWORD_LENGTH {
        return Err(PasswordValidationError::TooLong);
    }

    Ok(())
}

/// `validator` hook for password fields of incoming DTOs.
pub fn validate_password(password: &Secret<String>) -> Result<(), ValidationError> {
    validate_password_length(password).map_err(|_| {
        ValidationError::new("length").with_message(Cow::Owned(format!(
            "'Password' must be between {} and {} characters.",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )))
    })
}
