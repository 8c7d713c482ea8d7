//! Request and response bodies that exist only at the HTTP boundary.

use crate::domain::ports::{GatewaySession, PaymentCallback};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreated {
    pub success: bool,
    pub message: &'static str,
    pub contact_id: u64,
}

impl ContactCreated {
    pub fn new(contact_id: u64) -> Self {
        Self {
            success: true,
            message: "Contact message received successfully",
            contact_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCreated {
    pub success: bool,
    pub evaluation_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationCreated {
    pub success: bool,
    pub consultation_id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipCreated {
    pub success: bool,
    pub mentorship_id: u64,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
}

impl From<GatewaySession> for OrderResponse {
    fn from(session: GatewaySession) -> Self {
        Self {
            id: session.reference,
            amount: session.amount,
            currency: session.currency,
            key: session.public_key,
            mock: session.mock,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub mock: bool,
}

/// Checkout callback as posted by either client widget.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyPaymentBody {
    #[serde(alias = "razorpay_payment_id", alias = "paymentId")]
    pub payment_id: Option<String>,
    #[serde(alias = "razorpay_order_id", alias = "payment_intent", alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(alias = "razorpay_signature")]
    pub signature: Option<String>,
}

impl From<VerifyPaymentBody> for PaymentCallback {
    fn from(body: VerifyPaymentBody) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Self {
            payment_id: present(body.payment_id),
            order_id: present(body.order_id),
            signature: present(body.signature),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerified {
    pub success: bool,
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub signature: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub mode: &'static str,
}
