//! Application layer containing the payment orchestration.
//!
//! `PaymentProcessor` composes the BIN router, the acquirer gateway and the
//! transaction store into the request-to-response flow. Each call runs
//! independently; the store is the only shared mutable state.

pub mod processor;
