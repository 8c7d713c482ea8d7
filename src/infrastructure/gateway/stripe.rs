use super::{http_client, read_json};
use crate::domain::payment::CheckoutFlow;
use crate::domain::ports::{GatewaySession, PaymentCallback, PaymentGateway, SessionRequest, Verdict};
use crate::domain::signature;
use crate::domain::validation::Choice;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

#[derive(Deserialize)]
struct PaymentIntent {
    id: String,
    client_secret: String,
    amount: i64,
    currency: String,
}

/// Intent-based gateway: the server opens a payment intent and hands its
/// client secret to the browser, which confirms it directly with Stripe.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
    publishable_key: String,
    signing_secret: String,
    timeout: Duration,
}

impl StripeGateway {
    pub fn new(
        secret_key: impl Into<String>,
        publishable_key: impl Into<String>,
        signing_secret: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
            publishable_key: publishable_key.into(),
            signing_secret: signing_secret.into(),
            timeout,
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn name(&self) -> &'static str {
        "stripe"
    }

    fn supports(&self, flow: CheckoutFlow) -> bool {
        flow == CheckoutFlow::Intent
    }

    async fn create_session(&self, request: SessionRequest) -> Result<GatewaySession> {
        let form_body = [
            ("amount", request.amount.to_string()),
            ("currency", request.currency.to_lowercase()),
            ("description", request.service_type.display_name().to_string()),
            ("metadata[serviceType]", request.service_type.as_str().to_string()),
            ("metadata[receipt]", request.receipt.clone()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&form_body)
            .send()
            .await;
        let intent: PaymentIntent = read_json(self.name(), self.timeout, response).await?;

        Ok(GatewaySession {
            reference: intent.id,
            amount: intent.amount,
            currency: intent.currency.to_uppercase(),
            public_key: self.publishable_key.clone(),
            client_secret: Some(intent.client_secret),
            mock: false,
        })
    }

    fn verify(&self, callback: &PaymentCallback) -> Verdict {
        let (Some(intent_id), Some(payment_id), Some(sig)) = (
            callback.order_id.as_deref(),
            callback.payment_id.as_deref(),
            callback.signature.as_deref(),
        ) else {
            return Verdict::Rejected;
        };

        if signature::verify(&self.signing_secret, intent_id, payment_id, sig) {
            Verdict::Verified {
                payment_id: payment_id.to_string(),
                order_id: Some(intent_id.to_string()),
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

    #[test]
    fn test_intent_flow_and_signing_secret() {
        let gateway = StripeGateway::new(
            "sk_test",
            "pk_test",
            "whsec_test",
            DEFAULT_API_BASE,
            Duration::from_secs(1),
        )
        .unwrap();
        assert!(gateway.supports(CheckoutFlow::Intent));
        assert!(!gateway.supports(CheckoutFlow::Order));

        let sig = signature::sign("whsec_test", "pi_1", "ch_1").unwrap();
        let callback = PaymentCallback {
            payment_id: Some("ch_1".to_string()),
            order_id: Some("pi_1".to_string()),
            signature: Some(sig),
        };
        assert!(gateway.verify(&callback).is_verified());

        // the secret key is not the signing secret
        let wrong = signature::sign("sk_test", "pi_1", "ch_1").unwrap();
        let callback = PaymentCallback {
            signature: Some(wrong),
            ..callback
        };
        assert_eq!(gateway.verify(&callback), Verdict::Rejected);
    }
}
