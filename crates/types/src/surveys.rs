//! Survey and admin reporting types

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// An active survey
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Question definitions, passed through as the backend sends them
    #[serde(default)]
    pub questions: Vec<JsonValue>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// A submitted survey response, as listed for admins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(default)]
    pub id: String,

    pub survey_id: String,

    pub user_email: String,

    #[serde(default)]
    pub responses: IndexMap<String, JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Generic `{success, message}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,

    #[serde(default)]
    pub message: String,
}

/// Metrics returned by `GET /admin/dashboard`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminDashboard {
    #[serde(default)]
    pub users: UserMetrics,

    #[serde(default)]
    pub leads: LeadMetrics,

    #[serde(default)]
    pub surveys: SurveyMetrics,

    #[serde(default)]
    pub revenue: RevenueMetrics,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetrics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub paid: u64,
    #[serde(default)]
    pub recent_signups: u64,
    /// Percentage of paid users
    #[serde(default)]
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadMetrics {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub recent: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyMetrics {
    #[serde(default)]
    pub total_responses: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueMetrics {
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub monthly_target: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_dashboard() {
        let json = r#"{
            "users": {"total": 40, "paid": 10, "recent_signups": 3, "conversion_rate": 25.0},
            "leads": {"total": 120, "recent": 12},
            "surveys": {"total_responses": 7},
            "revenue": {"total": 0.0, "monthly_target": 925.0}
        }"#;

        let dashboard: AdminDashboard = serde_json::from_str(json).unwrap();
        assert_eq!(dashboard.users.paid, 10);
        assert_eq!(dashboard.leads.recent, 12);
        assert_eq!(dashboard.surveys.total_responses, 7);
        assert_eq!(dashboard.revenue.monthly_target, 925.0);
    }

    #[test]
    fn test_survey_response_keeps_answer_order() {
        let json = r#"{
            "survey_id": "s-1",
            "user_email": "a@example.com",
            "responses": {"q2": "yes", "q1": 4}
        }"#;

        let response: SurveyResponse = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = response.responses.keys().cloned().collect();
        assert_eq!(keys, vec!["q2", "q1"]);
    }
}
