use super::choices::ServiceType;
use super::money::Amount;
use super::ports::{Record, Verdict};
use super::validation::Validator;
use crate::error::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

impl ServiceType {
    /// Listed price in major units of the default currency.
    pub fn canonical_price(&self) -> Decimal {
        match self {
            Self::SelfEvaluation => dec!(250),
            Self::Consultancy => dec!(1000),
            Self::Mentorship => dec!(10000),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SelfEvaluation => "Self Evaluation",
            Self::Consultancy => "Expert Consultancy",
            Self::Mentorship => "Mentorship Program",
        }
    }
}

/// Checkout integration style: a gateway-side order, or a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutFlow {
    Order,
    Intent,
}

impl CheckoutFlow {
    /// Prefix marking a reference as synthesized in mock mode.
    pub fn mock_prefix(&self) -> &'static str {
        match self {
            Self::Order => "mock_order",
            Self::Intent => "mock_intent",
        }
    }
}

impl fmt::Display for CheckoutFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => f.write_str("order"),
            Self::Intent => f.write_str("intent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentStatus {
    /// Status after a verification outcome. `Succeeded` is terminal; a verified
    /// callback lifts `Failed` since only the gateway can produce a valid signature.
    pub fn after(self, verdict: &Verdict) -> Self {
        match (self, verdict.is_verified()) {
            (Self::Succeeded, _) => Self::Succeeded,
            (_, true) => Self::Succeeded,
            (_, false) => Self::Failed,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Succeeded => f.write_str("succeeded"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub amount: Amount,
    pub currency: String,
    pub service_type: ServiceType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: u64,
    pub amount: Amount,
    pub currency: String,
    pub service_type: ServiceType,
    pub status: PaymentStatus,
    /// Gateway order or intent id, once the gateway has answered.
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn attach_reference(&mut self, reference: impl Into<String>) {
        self.reference = Some(reference.into());
    }

    /// Applies a verification outcome. Returns whether the status changed.
    pub fn settle(&mut self, verdict: &Verdict) -> bool {
        let next = self.status.after(verdict);
        let changed = next != self.status;
        self.status = next;
        changed
    }
}

impl Record for Payment {
    type New = NewPayment;
    const COLLECTION: &'static str = "payments";

    fn assemble(id: u64, created_at: DateTime<Utc>, new: NewPayment) -> Self {
        Self {
            id,
            amount: new.amount,
            currency: new.currency,
            service_type: new.service_type,
            status: PaymentStatus::Pending,
            reference: None,
            created_at,
        }
    }

    fn id(&self) -> u64 {
        self.id
    }

    /// Payments are found by the gateway reference once one is attached.
    fn lookup_key(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

/// Raw checkout request as posted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutSubmission {
    pub amount: Option<Decimal>,
    pub service_type: String,
}

impl CheckoutSubmission {
    pub fn validate(self) -> Result<(Amount, ServiceType)> {
        let mut v = Validator::new();
        let amount = match self.amount {
            None => {
                v.fail("amount", "is required");
                None
            }
            Some(value) => match Amount::new(value) {
                Ok(amount) => Some(amount),
                Err(_) => {
                    v.fail("amount", "must be positive");
                    None
                }
            },
        };
        let service_type = v.choice::<ServiceType>("serviceType", &self.service_type);

        match (amount, service_type) {
            (Some(amount), Some(service_type)) if v.is_clean() => Ok((amount, service_type)),
            _ => Err(v.into_error()),
        }
    }
}
