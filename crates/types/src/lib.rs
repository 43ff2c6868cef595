//! Shared data model of the BizPrompt backend API.
//!
//! Every type here mirrors a JSON payload exchanged with the backend under
//! `/api`. Fields the client never interprets are kept lenient (defaults,
//! optional timestamps) so older and newer backends both parse.

pub mod accounts;
pub mod payments;
pub mod prompts;
pub mod surveys;

pub use accounts::{
    AuthResponse, LeadMagnetResponse, LeadMagnetSignup, LoginRequest, RegisterRequest, User,
    UserRole,
};
pub use payments::{CheckoutRequest, CheckoutSession, PaymentStatus, ProductType, StatusKind};
pub use prompts::{CategoryCount, Prompt, PromptCategory, PromptFilter};
pub use surveys::{Acknowledgement, AdminDashboard, Survey, SurveyResponse};

use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-success responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// What the customer dashboard shows: the account and the categories unlocked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub user: User,
    pub categories: Vec<CategoryCount>,
}

impl Dashboard {
    /// Total number of prompts across all categories
    pub fn total_prompts(&self) -> u64 {
        self.categories.iter().map(|c| c.count).sum()
    }
}
