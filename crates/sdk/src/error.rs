use thiserror::Error;

/// Errors returned by the backend client
#[derive(Error, Debug)]
pub enum SdkError {
    /// HTTP error from reqwest (connection refused, timeout, bad body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Backend rejected the session token; the session has been cleared
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Endpoint requires a session and none is present
    #[error("Not authenticated: log in first")]
    NotAuthenticated,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Endpoint or redirect URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Checkout was created but the backend returned no payment page
    #[error("No checkout URL received")]
    MissingCheckoutUrl,
}

impl SdkError {
    /// HTTP status code, when the error came from a backend response
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            SdkError::Unauthorized(_) => Some(401),
            SdkError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
