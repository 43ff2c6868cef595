use std::time::Duration;

// Re-export shared types from bizprompt-types
pub use bizprompt_types::{
    Acknowledgement, AdminDashboard, AuthResponse, CategoryCount, CheckoutRequest,
    CheckoutSession, Dashboard, LeadMagnetResponse, LeadMagnetSignup, LoginRequest,
    PaymentStatus, ProductType, Prompt, PromptCategory, PromptFilter, RegisterRequest,
    StatusKind, Survey, SurveyResponse, User, UserRole,
};

/// Default backend when nothing is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8001";

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (without the `/api` prefix)
    pub endpoint: String,

    /// Per-request timeout (milliseconds)
    pub timeout_ms: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 10_000,
            user_agent: format!("bizprompt-sdk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the URL of an API path, e.g. `/auth/me`
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.endpoint.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Configuration for payment confirmation polling
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between a pending answer and the next check (milliseconds)
    pub interval_ms: u64,

    /// Maximum number of status requests (None = no cap)
    pub max_attempts: Option<u32>,

    /// Overall time budget from the first request (None = no deadline)
    pub deadline: Option<Duration>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            max_attempts: None,
            deadline: None,
        }
    }
}

impl PollerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay between checks
    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Stop after this many requests while still pending.
    ///
    /// The first check is always made, so a cap of 0 behaves like 1.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = Some(max.max(1));
        self
    }

    /// Stop once this much time has passed while still pending
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Returns true if neither a cap nor a deadline is set
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts.is_none() && self.deadline.is_none()
    }
}
