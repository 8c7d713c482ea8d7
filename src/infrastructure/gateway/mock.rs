use crate::domain::payment::CheckoutFlow;
use crate::domain::ports::{GatewaySession, PaymentCallback, PaymentGateway, SessionRequest, Verdict};
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub const MOCK_ORDER_KEY: &str = "rzp_test_mock_key";
pub const MOCK_INTENT_KEY: &str = "pk_test_mock_key";
pub const MOCK_SIGNATURE: &str = "mock_signature";

/// Stand-in used when no gateway credentials are configured.
///
/// Serves both flows without network access and accepts every callback.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockGateway;

impl MockGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn supports(&self, _flow: CheckoutFlow) -> bool {
        true
    }

    fn is_mock(&self) -> bool {
        true
    }

    async fn create_session(&self, request: SessionRequest) -> Result<GatewaySession> {
        let reference = format!("{}_{}", request.flow.mock_prefix(), Uuid::new_v4().simple());
        let (public_key, client_secret) = match request.flow {
            CheckoutFlow::Order => (MOCK_ORDER_KEY, None),
            CheckoutFlow::Intent => (MOCK_INTENT_KEY, Some(format!("{reference}_secret_mock"))),
        };

        Ok(GatewaySession {
            reference,
            amount: request.amount,
            currency: request.currency,
            public_key: public_key.to_string(),
            client_secret,
            mock: true,
        })
    }

    fn verify(&self, callback: &PaymentCallback) -> Verdict {
        Verdict::Verified {
            payment_id: callback
                .payment_id
                .clone()
                .unwrap_or_else(|| format!("mock_payment_{}", Uuid::new_v4().simple())),
            order_id: callback.order_id.clone(),
            signature: callback
                .signature
                .clone()
                .unwrap_or_else(|| MOCK_SIGNATURE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::choices::ServiceType;

    fn request(flow: CheckoutFlow) -> SessionRequest {
        SessionRequest {
            flow,
            amount: 25000,
            currency: "INR".to_string(),
            service_type: ServiceType::SelfEvaluation,
            receipt: "receipt_1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_order_session() {
        let session = MockGateway::new()
            .create_session(request(CheckoutFlow::Order))
            .await
            .unwrap();

        let suffix = session.reference.strip_prefix("mock_order_").unwrap();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(session.amount, 25000);
        assert_eq!(session.currency, "INR");
        assert_eq!(session.public_key, MOCK_ORDER_KEY);
        assert!(session.client_secret.is_none());
        assert!(session.mock);
    }

    #[tokio::test]
    async fn test_mock_intent_session_has_client_secret() {
        let session = MockGateway::new()
            .create_session(request(CheckoutFlow::Intent))
            .await
            .unwrap();
        assert!(session.reference.starts_with("mock_intent_"));
        assert_eq!(session.public_key, MOCK_INTENT_KEY);
        assert!(session.client_secret.unwrap().starts_with(&session.reference));
    }

    #[tokio::test]
    async fn test_mock_references_are_distinct() {
        let gateway = MockGateway::new();
        let a = gateway.create_session(request(CheckoutFlow::Order)).await.unwrap();
        let b = gateway.create_session(request(CheckoutFlow::Order)).await.unwrap();
        assert_ne!(a.reference, b.reference);
    }

    #[test]
    fn test_mock_verify_fills_defaults() {
        let Verdict::Verified {
            payment_id,
            order_id,
            signature,
        } = MockGateway::new().verify(&PaymentCallback::default())
        else {
            panic!("mock mode always verifies");
        };
        assert!(payment_id.starts_with("mock_payment_"));
        assert_eq!(payment_id.len(), "mock_payment_".len() + 32);
        assert_eq!(order_id, None);
        assert_eq!(signature, MOCK_SIGNATURE);
    }

    #[test]
    fn test_mock_verify_echoes_given_fields() {
        let callback = PaymentCallback {
            payment_id: Some("pay_9".to_string()),
            order_id: Some("mock_order_abc".to_string()),
            signature: Some("anything".to_string()),
        };
        assert_eq!(
            MockGateway::new().verify(&callback),
            Verdict::Verified {
                payment_id: "pay_9".to_string(),
                order_id: Some("mock_order_abc".to_string()),
                signature: "anything".to_string(),
            }
        );
    }
}
