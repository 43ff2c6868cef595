//! BizPrompt SDK
//!
//! This crate provides the client side of the BizPrompt backend: account and
//! session handling, the prompt library, surveys, checkout, and confirmation
//! of a payment once the hosted checkout page redirects back.
//!
//! # Overview
//!
//! The SDK provides two main abstractions:
//!
//! - [`ApiClient`] - Backend client holding an explicit [`Session`]
//! - [`PaymentPoller`] - Checks a checkout session until the payment settles
//!
//! # Quick Start
//!
//! ## Buying and confirming
//!
//! ```ignore
//! use bizprompt_sdk::{
//!     ApiClient, CheckoutRequest, ClientConfig, PaymentPoller, PollPhase, PollerConfig,
//!     ProductType,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::new("https://api.example.com"))?;
//!
//!     let checkout = client
//!         .create_checkout(&CheckoutRequest {
//!             product_type: ProductType::Presale,
//!             success_url: "https://shop.example.com/success".into(),
//!             cancel_url: "https://shop.example.com/".into(),
//!         })
//!         .await?;
//!     println!("Pay at {}", checkout.checkout_url.unwrap_or_default());
//!
//!     // ... later, with the session id from the redirect:
//!     let poller = PaymentPoller::new(client, PollerConfig::default());
//!     let state = poller.confirm(checkout.session_id.as_deref()).await;
//!     assert_eq!(state.phase, PollPhase::Succeeded);
//!     Ok(())
//! }
//! ```
//!
//! ## Logging in
//!
//! ```ignore
//! use bizprompt_sdk::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::new(ClientConfig::default())?;
//! let session = client.login("ada@example.com", "secret").await?;
//! println!("Hello {}", session.user.display_name());
//!
//! let dashboard = client.dashboard().await?;
//! for category in dashboard.categories {
//!     println!("{}: {}", category.category.title(), category.count);
//! }
//! ```
//!
//! # Payment statuses
//!
//! The poller only interprets the `payment_status` field:
//!
//! - `paid` - confirmed, polling stops
//! - `pending` - checked again after the configured interval
//! - anything else - the payment did not go through, polling stops

pub mod client;
pub mod error;
pub mod poller;
pub mod session;
pub mod types;

// Re-export main types at crate root
pub use client::{ApiClient, session_id_from_redirect};
pub use error::{Result, SdkError};
pub use poller::{
    ConfirmationView, PaymentPoller, PollError, PollHandle, PollPhase, PollState, StatusSource,
};
pub use session::Session;
pub use types::{
    Acknowledgement, AdminDashboard, AuthResponse, CategoryCount, CheckoutRequest,
    CheckoutSession, ClientConfig, Dashboard, LeadMagnetResponse, LeadMagnetSignup,
    PaymentStatus, PollerConfig, ProductType, Prompt, PromptCategory, PromptFilter,
    RegisterRequest, StatusKind, Survey, SurveyResponse, User, UserRole,
};
