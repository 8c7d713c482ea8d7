//! Application layer orchestrating the domain over the storage and gateway ports.
//!
//! [`intake::IntakeService`] validates and stores form submissions;
//! [`checkout::CheckoutService`] opens gateway sessions and settles payments.

pub mod checkout;
pub mod intake;
