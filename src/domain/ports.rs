use super::choices::ServiceType;
use super::payment::CheckoutFlow;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// An entity kept in one collection of the record store.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The validated input a record is created from.
    type New: Send + 'static;

    /// Collection (table, column family) name.
    const COLLECTION: &'static str;

    /// Builds the stored record once the store has picked its id and timestamp.
    fn assemble(id: u64, created_at: DateTime<Utc>, new: Self::New) -> Self;

    fn id(&self) -> u64;

    /// Whether two records may share a lookup key. Creating a record whose key
    /// is already taken is a conflict when this is set.
    const UNIQUE_KEY: bool = false;

    /// Secondary key the store indexes for [`Repository::find_by_key`], if any.
    fn lookup_key(&self) -> Option<&str> {
        None
    }
}

/// In-place edit applied by [`Repository::update_with`]. Returns whether the
/// record changed and must be written back.
pub type Change<T> = Box<dyn FnOnce(&mut T) -> bool + Send>;

/// Storage for one collection. Ids start at 1 and increase by one per create.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn create(&self, new: T::New) -> Result<T>;
    async fn get(&self, id: u64) -> Result<Option<T>>;
    /// The record indexed under `key`.
    async fn find_by_key(&self, key: &str) -> Result<Option<T>>;
    /// All records, ordered by id.
    async fn all(&self) -> Result<Vec<T>>;
    /// Replaces the record with the same id. Returns `None` if there is none.
    async fn update(&self, record: T) -> Result<Option<T>>;
    /// Reads, edits and writes back the record with `id` while no other write
    /// can interleave. Returns the record before and after the edit, or `None`
    /// if there is none.
    async fn update_with(&self, id: u64, change: Change<T>) -> Result<Option<(T, T)>>;
}

pub type SharedRepository<T> = Arc<dyn Repository<T>>;

/// What the checkout asks a gateway for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub flow: CheckoutFlow,
    /// Amount in the currency's smallest subunit.
    pub amount: i64,
    pub currency: String,
    pub service_type: ServiceType,
    pub receipt: String,
}

/// A hosted order or intent, plus what the client widget needs to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySession {
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    pub public_key: String,
    pub client_secret: Option<String>,
    pub mock: bool,
}

/// Identifiers a gateway hands back to the client after checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentCallback {
    pub payment_id: Option<String>,
    pub order_id: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Verified {
        payment_id: String,
        order_id: Option<String>,
        signature: String,
    },
    Rejected,
}

impl Verdict {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// A payment provider able to open checkout sessions and vouch for their completion.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short provider name used in logs and the health report.
    fn name(&self) -> &'static str;

    fn supports(&self, flow: CheckoutFlow) -> bool;

    fn is_mock(&self) -> bool {
        false
    }

    async fn create_session(&self, request: SessionRequest) -> Result<GatewaySession>;

    fn verify(&self, callback: &PaymentCallback) -> Verdict;
}

pub type SharedGateway = Arc<dyn PaymentGateway>;
