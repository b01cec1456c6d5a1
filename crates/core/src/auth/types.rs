use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque bearer token issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiToken {
    pub token: String,
    pub user_id: Uuid,
    /// Label for the token, "Opaque Access Token" for login tokens.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// The token as handed to the client after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(rename = "type")]
    pub token_type: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&ApiToken> for TokenResponse {
    fn from(token: &ApiToken) -> Self {
        Self {
            token_type: "bearer".to_string(),
            token: token.token.clone(),
            expires_at: token.expires_at,
        }
    }
}

/// Single-use token mailed to a user to reset their password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
