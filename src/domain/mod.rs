//! Domain layer: card validation, BIN routing, the payment model and the
//! ports (traits) the application layer depends on.

pub mod card;
pub mod payment;
pub mod ports;
pub mod routing;
