//! Checkout and payment status types
//!
//! A purchase goes through two backend calls:
//!
//! ```text
//! POST /payments/create-checkout   -> { checkout_url, session_id }
//!   ... user pays on the hosted checkout page ...
//! GET  /payments/status/{session}  -> { session_id, payment_status, amount?, ... }
//! ```
//!
//! The hosted page redirects back with `?session_id=...`, which is what the
//! confirmation poller is started with.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Status string of a settled successful payment
pub const STATUS_PAID: &str = "paid";

/// Status string of a payment that has not settled yet
pub const STATUS_PENDING: &str = "pending";

/// Product packages offered at checkout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Presale,
    Regular,
}

impl ProductType {
    /// List price in USD
    pub fn price(&self) -> f64 {
        match self {
            ProductType::Presale => 37.0,
            ProductType::Regular => 47.0,
        }
    }

    pub fn currency(&self) -> &'static str {
        "usd"
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProductType::Presale => "AI Business Automation Toolkit - Presale",
            ProductType::Regular => "AI Business Automation Toolkit - Regular",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductType::Presale => write!(f, "presale"),
            ProductType::Regular => write!(f, "regular"),
        }
    }
}

impl std::str::FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "presale" => Ok(ProductType::Presale),
            "regular" => Ok(ProductType::Regular),
            _ => Err(format!(
                "Invalid product: {}. Valid options are: presale, regular",
                s
            )),
        }
    }
}

/// Payload for `POST /payments/create-checkout`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub product_type: ProductType,
    pub success_url: String,
    pub cancel_url: String,
}

/// Hosted checkout session created by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// URL of the hosted payment page
    #[serde(default)]
    pub checkout_url: Option<String>,

    #[serde(default)]
    pub session_id: Option<String>,
}

/// Payment status reported for one checkout session
///
/// Only `payment_status` is interpreted. Everything else is carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatus {
    #[serde(default)]
    pub session_id: String,

    pub payment_status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    /// Any other fields returned by the backend
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

/// How a reported payment status drives confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusKind {
    /// Terminal success
    Paid,
    /// Not settled yet, check again
    Pending,
    /// Terminal non-success, with the reported status string
    Settled(String),
}

impl PaymentStatus {
    pub fn new(session_id: impl Into<String>, payment_status: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            payment_status: payment_status.into(),
            amount: None,
            currency: None,
            product_name: None,
            extra: IndexMap::new(),
        }
    }

    pub fn classify(&self) -> StatusKind {
        match self.payment_status.as_str() {
            STATUS_PAID => StatusKind::Paid,
            STATUS_PENDING => StatusKind::Pending,
            other => StatusKind::Settled(other.to_string()),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.classify() == StatusKind::Paid
    }

    pub fn is_pending(&self) -> bool {
        self.classify() == StatusKind::Pending
    }

    /// Amount formatted with its currency, e.g. `37.00 USD`
    pub fn formatted_amount(&self) -> Option<String> {
        let amount = self.amount?;
        let currency = self
            .currency
            .as_deref()
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| "USD".to_string());
        Some(format!("{:.2} {}", amount, currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(PaymentStatus::new("cs_1", "paid").classify(), StatusKind::Paid);
        assert_eq!(
            PaymentStatus::new("cs_1", "pending").classify(),
            StatusKind::Pending
        );
        assert_eq!(
            PaymentStatus::new("cs_1", "expired").classify(),
            StatusKind::Settled("expired".to_string())
        );
    }

    #[test]
    fn test_unknown_fields_are_carried() {
        let json = r#"{
            "session_id": "cs_test_123",
            "payment_status": "paid",
            "amount": 37.0,
            "currency": "usd",
            "status": "complete",
            "metadata": {"product": "ai_toolkit_presale"}
        }"#;

        let status: PaymentStatus = serde_json::from_str(json).unwrap();
        assert!(status.is_paid());
        assert_eq!(status.extra["status"], "complete");
        assert_eq!(status.extra["metadata"]["product"], "ai_toolkit_presale");
        assert_eq!(status.formatted_amount().as_deref(), Some("37.00 USD"));

        let back = serde_json::to_value(&status).unwrap();
        assert_eq!(back["status"], "complete");
        assert!(back.get("product_name").is_none());
    }

    #[test]
    fn test_product_type() {
        assert_eq!("Regular".parse::<ProductType>().unwrap(), ProductType::Regular);
        assert!("gold".parse::<ProductType>().is_err());
        assert_eq!(ProductType::Presale.price(), 37.0);

        let request = CheckoutRequest {
            product_type: ProductType::Presale,
            success_url: "https://shop.example.com/success".to_string(),
            cancel_url: "https://shop.example.com/".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["product_type"], "presale");
    }
}
