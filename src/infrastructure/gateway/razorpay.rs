use super::{http_client, read_json};
use crate::domain::payment::CheckoutFlow;
use crate::domain::ports::{GatewaySession, PaymentCallback, PaymentGateway, SessionRequest, Verdict};
use crate::domain::signature;
use crate::domain::validation::Choice;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.razorpay.com";

#[derive(Serialize)]
struct OrderNotes<'a> {
    #[serde(rename = "serviceType")]
    service_type: &'a str,
}

#[derive(Serialize)]
struct CreateOrder<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: OrderNotes<'a>,
}

#[derive(Deserialize)]
struct Order {
    id: String,
    amount: i64,
    currency: String,
}

/// Order-based gateway: the server creates an order, the client widget
/// collects the payment, and the callback is signed with the key secret.
pub struct RazorpayGateway {
    client: reqwest::Client,
    api_base: String,
    key_id: String,
    key_secret: String,
    timeout: Duration,
}

impl RazorpayGateway {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            timeout,
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "razorpay"
    }

    fn supports(&self, flow: CheckoutFlow) -> bool {
        flow == CheckoutFlow::Order
    }

    async fn create_session(&self, request: SessionRequest) -> Result<GatewaySession> {
        let body = CreateOrder {
            amount: request.amount,
            currency: &request.currency,
            receipt: &request.receipt,
            notes: OrderNotes {
                service_type: request.service_type.as_str(),
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/orders", self.api_base))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&body)
            .send()
            .await;
        let order: Order = read_json(self.name(), self.timeout, response).await?;

        Ok(GatewaySession {
            reference: order.id,
            amount: order.amount,
            currency: order.currency,
            public_key: self.key_id.clone(),
            client_secret: None,
            mock: false,
        })
    }

    fn verify(&self, callback: &PaymentCallback) -> Verdict {
        let (Some(order_id), Some(payment_id), Some(sig)) = (
            callback.order_id.as_deref(),
            callback.payment_id.as_deref(),
            callback.signature.as_deref(),
        ) else {
            return Verdict::Rejected;
        };

        if signature::verify(&self.key_secret, order_id, payment_id, sig) {
            Verdict::Verified {
                payment_id: payment_id.to_string(),
                order_id: Some(order_id.to_string()),
                signature: sig.to_string(),
            }
        } else {
            Verdict::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> RazorpayGateway {
        RazorpayGateway::new("rzp_test_key", "key_secret", "http://localhost/", Duration::from_secs(1))
            .unwrap()
    }

    fn callback(signature: Option<String>) -> PaymentCallback {
        PaymentCallback {
            payment_id: Some("pay_1".to_string()),
            order_id: Some("order_1".to_string()),
            signature,
        }
    }

    #[test]
    fn test_only_order_flow() {
        let gateway = gateway();
        assert!(gateway.supports(CheckoutFlow::Order));
        assert!(!gateway.supports(CheckoutFlow::Intent));
        assert!(!gateway.is_mock());
        assert_eq!(gateway.api_base, "http://localhost");
    }

    #[test]
    fn test_verify_with_key_secret() {
        let gateway = gateway();
        let good = signature::sign("key_secret", "order_1", "pay_1").unwrap();
        assert!(gateway.verify(&callback(Some(good))).is_verified());

        let forged = signature::sign("other", "order_1", "pay_1").unwrap();
        assert_eq!(gateway.verify(&callback(Some(forged))), Verdict::Rejected);
    }

    #[test]
    fn test_verify_requires_every_field() {
        let gateway = gateway();
        let good = signature::sign("key_secret", "order_1", "pay_1").unwrap();
        assert_eq!(gateway.verify(&callback(None)), Verdict::Rejected);

        let mut missing_order = callback(Some(good));
        missing_order.order_id = None;
        assert_eq!(gateway.verify(&missing_order), Verdict::Rejected);
        assert_eq!(gateway.verify(&PaymentCallback::default()), Verdict::Rejected);
    }
}
