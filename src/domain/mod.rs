//! Entities, value objects and the ports the rest of the crate plugs into.

pub mod choices;
pub mod money;
pub mod payment;
pub mod ports;
pub mod signature;
pub mod submission;
pub mod validation;
