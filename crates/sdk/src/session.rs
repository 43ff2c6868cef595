//! Authenticated session held by the client.
//!
//! A [`Session`] is created from the backend's login or registration answer
//! and is owned by one [`ApiClient`](crate::ApiClient). There is no global
//! token: whoever holds the client holds the session, and `logout` (or a 401
//! from the backend) clears it.

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::types::{AuthResponse, User};

/// Bearer token plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Expiry (unix seconds) read from the token's `exp` claim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,

    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: User) -> Self {
        let access_token = access_token.into();
        let expires_at = extract_jwt_exp(&access_token);
        Self {
            access_token,
            token_type: default_token_type(),
            expires_at,
            user,
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Check if the access token is expired.
    ///
    /// Tokens without an `exp` claim never expire client-side; the backend
    /// stays the authority and answers 401 when it disagrees.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => exp < chrono::Utc::now().timestamp(),
            None => false,
        }
    }
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        let mut session = Session::new(response.access_token, response.user);
        session.token_type = response.token_type;
        session
    }
}

/// Extract exp claim from JWT without validation
fn extract_jwt_exp(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .ok()?;

    let payload_json: serde_json::Value = serde_json::from_slice(&payload).ok()?;
    payload_json.get("exp")?.as_i64()
}
