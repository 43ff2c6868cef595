//! Prompt library types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a prompt
///
/// Unknown categories are kept verbatim so new backend categories
/// still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromptCategory {
    Email,
    Content,
    Research,
    Meetings,
    Sales,
    Other(String),
}

impl PromptCategory {
    pub fn as_str(&self) -> &str {
        match self {
            PromptCategory::Email => "email",
            PromptCategory::Content => "content",
            PromptCategory::Research => "research",
            PromptCategory::Meetings => "meetings",
            PromptCategory::Sales => "sales",
            PromptCategory::Other(other) => other,
        }
    }

    /// Human-readable title used on the dashboard
    pub fn title(&self) -> String {
        match self {
            PromptCategory::Email => "Email Automation".to_string(),
            PromptCategory::Content => "Content Creation".to_string(),
            PromptCategory::Research => "Research & Analysis".to_string(),
            PromptCategory::Meetings => "Meeting Productivity".to_string(),
            PromptCategory::Sales => "Sales & Outreach".to_string(),
            PromptCategory::Other(other) => {
                let mut chars = other.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl From<String> for PromptCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "email" => PromptCategory::Email,
            "content" => PromptCategory::Content,
            "research" => PromptCategory::Research,
            "meetings" => PromptCategory::Meetings,
            "sales" => PromptCategory::Sales,
            _ => PromptCategory::Other(value),
        }
    }
}

impl From<PromptCategory> for String {
    fn from(value: PromptCategory) -> Self {
        value.as_str().to_string()
    }
}

impl std::str::FromStr for PromptCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PromptCategory::from(s.to_lowercase()))
    }
}

impl std::fmt::Display for PromptCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A prompt from the library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    pub category: PromptCategory,

    #[serde(default)]
    pub prompt_text: String,

    /// Estimated minutes saved per use
    #[serde(default)]
    pub time_saved_minutes: u32,

    /// One of `beginner`, `intermediate` or `advanced`
    #[serde(default = "default_difficulty")]
    pub difficulty_level: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_premium: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_difficulty() -> String {
    "beginner".to_string()
}

/// Query filters for `GET /prompts`
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PromptCategory>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
}

impl PromptFilter {
    pub fn with_category(mut self, category: PromptCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_premium(mut self, is_premium: bool) -> Self {
        self.is_premium = Some(is_premium);
        self
    }
}

/// Number of prompts in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: PromptCategory,
    pub count: u64,
}
