//! Request and Response Models
//!
//! Input payloads for the user use cases, validated with the validator crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{email_validator, name_validator};

/// Input for registering a new user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserRegistrationData {
    /// Display name (not blank, up to 255 characters)
    #[validate(custom(function = "name_validator"))]
    pub name: String,

    /// Email address, unique across all stored users
    #[validate(custom(function = "email_validator"))]
    pub email: String,

    /// Plaintext password, hashed before it is stored
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be between 1 and 128 characters"
    ))]
    pub password: String,
}

/// Input for the self-service update
///
/// There is deliberately no email field here; email cannot change through
/// this path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserModificationData {
    /// New display name
    #[validate(custom(function = "name_validator"))]
    pub name: String,

    /// New plaintext password
    #[validate(length(
        min = 1,
        max = 128,
        message = "Password must be between 1 and 128 characters"
    ))]
    pub password: String,
}

/// Response for health check
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_data_valid() {
        let data = UserRegistrationData {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: "pw1".to_string(),
        };
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_registration_data_rejects_bad_email() {
        let data = UserRegistrationData {
            name: "Ann".to_string(),
            email: "not-an-email".to_string(),
            password: "pw1".to_string(),
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_registration_data_rejects_empty_password() {
        let data = UserRegistrationData {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: String::new(),
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_modification_data_rejects_blank_name() {
        let data = UserModificationData {
            name: "   ".to_string(),
            password: "pw2".to_string(),
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_modification_data_ignores_unknown_email_field() {
        let data: UserModificationData = serde_json::from_str(
            r#"{"name": "Ann2", "password": "pw2", "email": "other@x.com"}"#,
        )
        .unwrap();
        assert_eq!(data.name, "Ann2");
        assert!(data.validate().is_ok());
    }
}
