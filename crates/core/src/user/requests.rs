//! API request types for user operations.
//!
//! Every field is optional at the deserialization layer: a missing field is
//! a validation failure reported by [`crate::validation`], not a malformed
//! body.

use serde::{Deserialize, Serialize};

use crate::serde::deserialize_optional_string;

/// Request payload for registering a new user (POST /users).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
}

impl CreateUserRequest {
    /// Create a request with all fields set.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }
}

/// Request payload for updating a user (PUT /users/{id}).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub avatar: Option<String>,
}

/// Request payload for starting a password reset (POST /forgot-password).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub reset_password_url: Option<String>,
}

/// Request payload for completing a password reset (POST /reset-password).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_deserializes_to_all_none() {
        let request: CreateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(request.username.is_none());
        assert!(request.email.is_none());
        assert!(request.password.is_none());
    }

    #[test]
    fn test_forgot_password_uses_camel_case() {
        let json = r#"{"email": "a@b.co", "resetPasswordUrl": "https://app.io/reset"}"#;
        let request: ForgotPasswordRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.reset_password_url,
            Some("https://app.io/reset".to_string())
        );
    }
}
