//! Input validation utilities.

use regex::Regex;

use crate::types::AuthError;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.len() > 255 {
        return Err(AuthError::Validation("email too long".to_string()));
    }

    let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map_err(|_| AuthError::Validation("invalid email regex".to_string()))?;

    if !email_regex.is_match(email) {
        return Err(AuthError::Validation("invalid email format".to_string()));
    }

    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::Validation("name is required".to_string()));
    }
    if name.len() > 255 {
        return Err(AuthError::Validation("name too long".to_string()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("password is required".to_string()));
    }
    if password.len() > 128 {
        return Err(AuthError::Validation(
            "password must be at most 128 characters long".to_string(),
        ));
    }
    Ok(())
}
