use crate::domain::payment::{CheckoutFlow, CheckoutSubmission, NewPayment, Payment, PaymentStatus};
use crate::domain::ports::{
    GatewaySession, PaymentCallback, SessionRequest, SharedGateway, SharedRepository, Verdict,
};
use crate::domain::validation::Choice;
use crate::error::{PulseError, Result};
use std::time::Duration;
use tracing::{error, info, warn};

pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// How the order flow treats a client amount that differs from the listed price.
/// The intent flow always enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricePolicy {
    /// Charge what the client asked for, logging the mismatch.
    #[default]
    Trust,
    /// Reject the request.
    Enforce,
}

/// A freshly opened checkout: the pending payment and the gateway's session.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub payment: Payment,
    pub session: GatewaySession,
}

/// Opens gateway checkouts and settles payments from their callbacks.
pub struct CheckoutService {
    payments: SharedRepository<Payment>,
    gateway: SharedGateway,
    currency: String,
    timeout: Duration,
    price_policy: PricePolicy,
}

impl CheckoutService {
    pub fn new(payments: SharedRepository<Payment>, gateway: SharedGateway, currency: String) -> Self {
        Self {
            payments,
            gateway,
            currency,
            timeout: DEFAULT_GATEWAY_TIMEOUT,
            price_policy: PricePolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_price_policy(mut self, price_policy: PricePolicy) -> Self {
        self.price_policy = price_policy;
        self
    }

    /// Name of the active gateway, `mock` when running without credentials.
    pub fn mode(&self) -> &'static str {
        self.gateway.name()
    }

    pub fn is_mock(&self) -> bool {
        self.gateway.is_mock()
    }

    /// Creates a pending payment and opens a gateway session for it.
    ///
    /// The payment is created before the gateway is called and is left
    /// pending if the call fails.
    pub async fn initiate(&self, flow: CheckoutFlow, submission: CheckoutSubmission) -> Result<Checkout> {
        let (amount, service_type) = submission.validate()?;

        if !self.gateway.supports(flow) {
            error!(%flow, gateway = self.gateway.name(), "checkout flow not configured");
            return Err(PulseError::GatewayError(format!(
                "{flow} checkout is not configured"
            )));
        }

        let listed = service_type.canonical_price();
        if amount.value() != listed {
            warn!(
                %flow,
                service_type = service_type.as_str(),
                requested = %amount,
                listed = %listed,
                "checkout amount differs from the listed price"
            );
            if flow == CheckoutFlow::Intent || self.price_policy == PricePolicy::Enforce {
                return Err(PulseError::invalid(
                    "amount",
                    format!("must be {listed} for {service_type}"),
                ));
            }
        }

        let subunits = amount.to_subunits()?;
        let mut payment = self
            .payments
            .create(NewPayment {
                amount,
                currency: self.currency.clone(),
                service_type,
            })
            .await?;

        let request = SessionRequest {
            flow,
            amount: subunits,
            currency: self.currency.clone(),
            service_type,
            receipt: format!("receipt_{}", payment.id),
        };

        let session = match tokio::time::timeout(self.timeout, self.gateway.create_session(request)).await {
            Ok(Ok(session)) => session,
            Ok(Err(err)) => {
                error!(payment_id = payment.id, %flow, %err, "gateway session failed, payment left pending");
                return Err(err);
            }
            Err(_) => {
                error!(payment_id = payment.id, %flow, timeout = ?self.timeout, "gateway session timed out, payment left pending");
                return Err(PulseError::GatewayTimeout(self.timeout));
            }
        };

        payment.attach_reference(session.reference.clone());
        let payment = self
            .payments
            .update(payment)
            .await?
            .ok_or_else(|| PulseError::NotFound(format!("payment {}", session.reference)))?;

        info!(
            payment_id = payment.id,
            reference = %session.reference,
            %flow,
            service_type = service_type.as_str(),
            mock = session.mock,
            "checkout opened"
        );
        Ok(Checkout { payment, session })
    }

    /// Checks a checkout callback and records the outcome on the matching payment.
    ///
    /// The answer depends only on the callback; an unknown reference is logged
    /// and left alone.
    pub async fn verify(&self, callback: &PaymentCallback) -> Result<Verdict> {
        let verdict = self.gateway.verify(callback);
        match &verdict {
            Verdict::Verified { payment_id, order_id, .. } => {
                info!(payment_id = %payment_id, reference = ?order_id, mock = self.is_mock(), "payment verified");
            }
            Verdict::Rejected => {
                warn!(reference = ?callback.order_id, "payment verification failed");
            }
        }

        if let Some(reference) = callback.order_id.as_deref() {
            self.record_outcome(reference, &verdict).await?;
        }
        Ok(verdict)
    }

    /// Applies the verdict to the stored payment in one atomic store update.
    /// A rejected callback never undoes a success, however the two interleave.
    async fn record_outcome(&self, reference: &str, verdict: &Verdict) -> Result<()> {
        let Some(payment) = self.find_by_reference(reference).await? else {
            warn!(reference, "verification for unknown payment reference");
            return Ok(());
        };

        let outcome = verdict.clone();
        let settled = self
            .payments
            .update_with(payment.id, Box::new(move |p: &mut Payment| p.settle(&outcome)))
            .await?;
        let Some((before, after)) = settled else {
            warn!(payment_id = payment.id, reference, "payment vanished before settlement");
            return Ok(());
        };

        if before.status != after.status {
            info!(
                payment_id = after.id,
                reference,
                previous = %before.status,
                status = %after.status,
                "payment status updated"
            );
        } else if before.status == PaymentStatus::Succeeded && !verdict.is_verified() {
            warn!(payment_id = after.id, reference, "rejected callback for a settled payment ignored");
        }
        Ok(())
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>> {
        self.payments.find_by_key(reference).await
    }

    pub async fn payment_by_reference(&self, reference: &str) -> Result<Payment> {
        self.find_by_reference(reference)
            .await?
            .ok_or_else(|| PulseError::NotFound(format!("payment {reference}")))
    }
}
