//! Adapters behind the domain ports: record stores and payment gateways.

pub mod gateway;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::domain::payment::Payment;
use crate::domain::ports::SharedRepository;
use crate::domain::submission::{Consultation, Contact, Mentorship, SelfEvaluation, User};
use in_memory::InMemoryRepository;
use std::sync::Arc;

/// One repository per collection, shared by the application services.
#[derive(Clone)]
pub struct Stores {
    pub users: SharedRepository<User>,
    pub self_evaluations: SharedRepository<SelfEvaluation>,
    pub consultations: SharedRepository<Consultation>,
    pub mentorships: SharedRepository<Mentorship>,
    pub contacts: SharedRepository<Contact>,
    pub payments: SharedRepository<Payment>,
}

impl Stores {
    /// Process-lifetime storage; contents are lost on restart.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryRepository::new()),
            self_evaluations: Arc::new(InMemoryRepository::new()),
            consultations: Arc::new(InMemoryRepository::new()),
            mentorships: Arc::new(InMemoryRepository::new()),
            contacts: Arc::new(InMemoryRepository::new()),
            payments: Arc::new(InMemoryRepository::new()),
        }
    }

    /// Every collection backed by the same RocksDB instance.
    #[cfg(feature = "storage-rocksdb")]
    pub fn persistent(store: rocksdb::RocksDBStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            self_evaluations: Arc::new(store.clone()),
            consultations: Arc::new(store.clone()),
            mentorships: Arc::new(store.clone()),
            contacts: Arc::new(store.clone()),
            payments: Arc::new(store),
        }
    }
}

impl Default for Stores {
    fn default() -> Self {
        Self::in_memory()
    }
}
