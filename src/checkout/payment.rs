//! Payment gateway seam
//!
//! The checkout hands a [`PaymentRequest`] to a [`PaymentGateway`] and gets
//! back a [`PaymentOutcome`]. Gateway responses are untrusted JSON and are
//! parsed through [`PaymentReceipt::from_response`].

use std::{fmt, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while reading a gateway response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// The response is not a JSON object.
    #[error("payment response is not an object")]
    NotAnObject,

    /// A required field is absent, empty or not a string.
    #[error("payment response field `{0}` is missing")]
    MissingField(&'static str),

    /// The response belongs to a different order.
    #[error("payment response is for order {actual}, expected {expected}")]
    OrderMismatch {
        /// Order id of the request
        expected: String,

        /// Order id in the response
        actual: String,
    },
}

/// Customer details pre-filled into the payment widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
    /// Full name
    pub name: String,

    /// Email
    pub email: String,

    /// Phone number
    pub contact: String,
}

/// A request to collect payment for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    /// Merchant-side order id
    pub order_id: String,

    /// Amount in the currency's minor units
    pub amount: i64,

    /// ISO currency code
    pub currency: &'static str,

    /// Line shown in the widget
    pub description: String,

    /// Customer details
    pub prefill: Prefill,
}

/// Proof of a completed payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReceipt {
    payment_id: String,
    order_id: String,
    signature: String,
}

impl PaymentReceipt {
    /// Extract a receipt from a raw gateway response.
    ///
    /// Only `payment_id`, `order_id` and `signature` are read; every other
    /// field is ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] when the response is not an object, a field
    /// is missing or empty, or the order id does not match `expected_order_id`.
    pub fn from_response(response: &Value, expected_order_id: &str) -> Result<Self, PaymentError> {
        let object = response.as_object().ok_or(PaymentError::NotAnObject)?;

        let field = |name: &'static str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToString::to_string)
                .ok_or(PaymentError::MissingField(name))
        };

        let payment_id = field("payment_id")?;
        let order_id = field("order_id")?;
        let signature = field("signature")?;

        if order_id != expected_order_id {
            return Err(PaymentError::OrderMismatch {
                expected: expected_order_id.to_string(),
                actual: order_id,
            });
        }

        Ok(Self {
            payment_id,
            order_id,
            signature,
        })
    }

    /// Gateway payment id.
    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }

    /// Order id the payment settles.
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Gateway signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// How a payment attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment captured.
    Success(PaymentReceipt),

    /// The shopper dismissed the widget.
    Cancelled,

    /// The gateway declined or errored.
    Failed(String),
}

/// Collects payment for an order.
#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Label shown on the order confirmation, e.g. `Credit Card (Razorpay)`.
    fn method(&self) -> String;

    /// Run one payment attempt to completion.
    async fn collect(&self, request: PaymentRequest) -> PaymentOutcome;
}

/// What the simulated gateway does with every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GatewayBehaviour {
    /// Approve every payment.
    #[default]
    Approve,

    /// Behave as if the shopper closed the widget.
    Cancel,

    /// Decline with the given reason.
    Fail(String),
}

impl fmt::Display for GatewayBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Cancel => f.write_str("cancel"),
            Self::Fail(reason) => write!(f, "fail ({reason})"),
        }
    }
}

/// Stand-in gateway that waits and then answers from its configured behaviour.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    behaviour: GatewayBehaviour,
}

impl SimulatedGateway {
    /// Create a gateway answering after `delay`.
    pub fn new(delay: Duration, behaviour: GatewayBehaviour) -> Self {
        Self { delay, behaviour }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000), GatewayBehaviour::Approve)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    fn method(&self) -> String {
        "Credit Card (Razorpay)".to_string()
    }

    async fn collect(&self, request: PaymentRequest) -> PaymentOutcome {
        tracing::debug!(
            order = %request.order_id,
            amount = request.amount,
            currency = request.currency,
            behaviour = %self.behaviour,
            "collecting payment"
        );

        tokio::time::sleep(self.delay).await;

        match &self.behaviour {
            GatewayBehaviour::Approve => {
                let response = json!({
                    "payment_id": format!("pay_{}", Uuid::new_v4().simple()),
                    "order_id": request.order_id,
                    "signature": Uuid::new_v4().simple().to_string(),
                    "amount": request.amount,
                    "currency": request.currency,
                });

                match PaymentReceipt::from_response(&response, &request.order_id) {
                    Ok(receipt) => PaymentOutcome::Success(receipt),
                    Err(error) => PaymentOutcome::Failed(error.to_string()),
                }
            }
            GatewayBehaviour::Cancel => PaymentOutcome::Cancelled,
            GatewayBehaviour::Fail(reason) => PaymentOutcome::Failed(reason.clone()),
        }
    }
}
