//! Account types for the BizPrompt backend.
//!
//! This module defines the user-facing account contract:
//! - **User** - A registered customer or admin, as returned by `/auth/me`
//! - **Credentials** - Login and registration payloads
//! - **AuthResponse** - Token + user pair returned by login and registration
//! - **LeadMagnetSignup** - Email capture for the free prompts guide
//!
//! # Example payload
//!
//! ```json
//! {
//!   "access_token": "eyJhbGciOiJIUzI1NiJ9...",
//!   "token_type": "bearer",
//!   "user": {
//!     "id": "6f1c...",
//!     "email": "ada@example.com",
//!     "first_name": "Ada",
//!     "role": "customer",
//!     "is_active": true,
//!     "subscription_status": "free"
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription statuses that unlock the premium prompt library
pub const PREMIUM_SUBSCRIPTION_STATUSES: &[&str] = &["paid", "trial"];

/// Role of a user account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Customer => write!(f, "customer"),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    #[serde(default = "default_true")]
    pub is_active: bool,

    /// One of `free`, `lead`, `trial` or `paid`
    #[serde(default = "default_subscription_status")]
    pub subscription_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Returns true if the subscription unlocks premium prompts
    pub fn has_premium_access(&self) -> bool {
        PREMIUM_SUBSCRIPTION_STATUSES.contains(&self.subscription_status.as_str())
    }

    /// Returns true if this user can reach the admin endpoints
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Full name when known, email otherwise
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_subscription_status() -> String {
    "free".to_string()
}

/// Payload for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl RegisterRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }
}

/// Token and user returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Payload for `POST /lead-magnet/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadMagnetSignup {
    pub email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    pub lead_magnet_type: String,

    pub source: String,
}

impl LeadMagnetSignup {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            first_name: None,
            lead_magnet_type: "ai_prompts_guide".to_string(),
            source: "website".to_string(),
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

/// Response of the lead magnet signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadMagnetResponse {
    pub success: bool,

    #[serde(default)]
    pub message: String,

    /// Download path of the free guide
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_magnet_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_auth_response() {
        let json = r#"{
            "access_token": "abc.def.ghi",
            "token_type": "bearer",
            "user": {
                "id": "u-1",
                "email": "ada@example.com",
                "first_name": "Ada",
                "last_name": null,
                "role": "customer",
                "is_active": true,
                "subscription_status": "free",
                "created_at": "2025-01-10T12:00:00+00:00",
                "last_login": null
            }
        }"#;

        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "abc.def.ghi");
        assert_eq!(response.user.role, UserRole::Customer);
        assert!(response.user.created_at.is_some());
        assert!(!response.user.has_premium_access());
        assert_eq!(response.user.display_name(), "Ada");
    }

    #[test]
    fn test_user_defaults() {
        let user: User = serde_json::from_str(r#"{"id": "u-2", "email": "b@example.com"}"#).unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert!(user.is_active);
        assert_eq!(user.subscription_status, "free");
        assert_eq!(user.display_name(), "b@example.com");
    }

    #[test]
    fn test_premium_access() {
        let mut user: User =
            serde_json::from_str(r#"{"id": "u-3", "email": "c@example.com", "role": "admin"}"#)
                .unwrap();
        assert!(user.is_admin());

        user.subscription_status = "trial".to_string();
        assert!(user.has_premium_access());
        user.subscription_status = "paid".to_string();
        assert!(user.has_premium_access());
        user.subscription_status = "lead".to_string();
        assert!(!user.has_premium_access());
    }

    #[test]
    fn test_lead_magnet_defaults() {
        let signup = LeadMagnetSignup::new("lead@example.com").with_first_name("Lee");
        let value = serde_json::to_value(&signup).unwrap();
        assert_eq!(value["lead_magnet_type"], "ai_prompts_guide");
        assert_eq!(value["source"], "website");
        assert_eq!(value["first_name"], "Lee");
    }

    #[test]
    fn test_register_request_skips_missing_names() {
        let request = RegisterRequest::new("x@example.com", "hunter2");
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("first_name").is_none());
        assert!(value.get("last_name").is_none());
    }
}
