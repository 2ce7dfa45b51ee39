// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request payload validation.

use crate::config::PasswordRequirements;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit
const MAX_TITLE_LENGTH: usize = 255;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Possible validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email: {0}")]
    InvalidEmail(String),

    #[error("password: {0}")]
    InvalidPassword(String),

    #[error("title: {0}")]
    InvalidTitle(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trim and validate an email address. Case is preserved; comparisons against
/// stored accounts are case-insensitive.
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::InvalidEmail("must not be empty".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "must not exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail("invalid email format".to_string()));
    }

    Ok(email)
}

/// Validate a new password against the configured requirements
pub fn validate_password<'a>(
    password: &'a str,
    requirements: &PasswordRequirements,
) -> ValidationResult<&'a str> {
    let length = password.chars().count();

    if length < requirements.min_length {
        return Err(ValidationError::InvalidPassword(format!(
            "must be at least {} characters",
            requirements.min_length
        )));
    }

    if length > requirements.max_length {
        return Err(ValidationError::InvalidPassword(format!(
            "must not exceed {} characters",
            requirements.max_length
        )));
    }

    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::InvalidPassword(
            "must contain an uppercase letter".to_string(),
        ));
    }

    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::InvalidPassword(
            "must contain a lowercase letter".to_string(),
        ));
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword("must contain a digit".to_string()));
    }

    if requirements.require_special && password.chars().all(char::is_alphanumeric) {
        return Err(ValidationError::InvalidPassword(
            "must contain a special character".to_string(),
        ));
    }

    Ok(password)
}

/// Trim and validate a task title
pub fn validate_task_title(title: &str) -> ValidationResult<&str> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::InvalidTitle("must not be empty".to_string()));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::InvalidTitle(format!(
            "must not exceed {MAX_TITLE_LENGTH} characters"
        )));
    }

    Ok(title)
}
