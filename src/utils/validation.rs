//! Validation Utilities
//!
//! Input validation functions for user data.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Longest name or email the users table accepts
pub const MAX_FIELD_LENGTH: usize = 255;

/// Validates email address format
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    let trimmed = email.trim();
    trimmed.len() <= MAX_FIELD_LENGTH && regex.is_match(trimmed)
}

/// Normalizes email address to lowercase and removes whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A name is any non-blank text up to the column width
pub fn validate_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= MAX_FIELD_LENGTH
}

/// Custom validator for email fields using the validator crate
pub fn email_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email").with_message(messages::INVALID_EMAIL.into()))
    }
}

/// Custom validator for name fields using the validator crate
pub fn name_validator(name: &str) -> Result<(), ValidationError> {
    if validate_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_name").with_message(messages::INVALID_NAME.into()))
    }
}

/// Flattens validator errors into one `field: message` line per failure
pub fn describe_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for field '{}'", field));
            messages.push(format!("{}: {}", field, message));
        }
    }

    messages.sort();
    messages.join(", ")
}

/// Validation error messages for user-friendly responses
pub mod messages {
    pub const INVALID_EMAIL: &str = "Please enter a valid email address";
    pub const INVALID_NAME: &str = "Name must not be blank or longer than 255 characters";
}
