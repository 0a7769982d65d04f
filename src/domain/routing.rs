use super::card::CardNumber;
use serde::Serialize;
use std::fmt;

/// Settlement acquirers a payment can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AcquirerId {
    A,
    B,
}

impl fmt::Display for AcquirerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquirerId::A => f.write_str("A"),
            AcquirerId::B => f.write_str("B"),
        }
    }
}

/// Selects the acquirer for a card from the digit sum of its BIN.
///
/// Even sum routes to `A`, odd to `B`. Same BIN, same acquirer.
pub fn choose_acquirer(card: &CardNumber) -> AcquirerId {
    let sum: u32 = card.bin().bytes().map(|b| u32::from(b - b'0')).sum();
    if sum % 2 == 0 {
        AcquirerId::A
    } else {
        AcquirerId::B
    }
}
